#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = lite_lms::run().await {
        eprintln!("lite-lms fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
