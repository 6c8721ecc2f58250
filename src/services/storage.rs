use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::core::config::Settings;

/// Local-disk file store. Uploaded submission files land under the upload
/// directory and lesson videos under the video directory, each with a
/// collision-resistant generated name; the returned path is the durable
/// reference recorded in the database.
#[derive(Debug, Clone)]
pub(crate) struct StorageService {
    upload_dir: PathBuf,
    video_dir: PathBuf,
}

impl StorageService {
    pub(crate) async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let upload_dir = PathBuf::from(&settings.storage().upload_dir);
        let video_dir = PathBuf::from(&settings.storage().video_dir);

        tokio::fs::create_dir_all(&upload_dir).await?;
        tokio::fs::create_dir_all(&video_dir).await?;

        Ok(Self { upload_dir, video_dir })
    }

    pub(crate) async fn store_submission_file(
        &self,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<String> {
        let filename = unique_filename(original_name);
        let path = self.upload_dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// Returns the URL-style reference (`/videos/{name}`) stored on the
    /// lesson row.
    pub(crate) async fn store_video(
        &self,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<String> {
        let filename = unique_filename(original_name);
        let path = self.video_dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(format!("/{}/{}", self.video_dir.to_string_lossy(), filename))
    }
}

/// `{uuid-hex}_{sanitized original}` so concurrent uploads of the same
/// filename never overwrite each other.
pub(crate) fn unique_filename(original_name: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitized_filename(original_name))
}

pub(crate) fn sanitized_filename(name: &str) -> String {
    let base = Path::new(name).file_name().and_then(|n| n.to_str()).unwrap_or(name);
    let sanitized: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect();

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::{sanitized_filename, unique_filename};

    #[test]
    fn sanitized_filename_strips_path_and_specials() {
        assert_eq!(sanitized_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitized_filename("my report (final).pdf"), "myreportfinal.pdf");
        assert_eq!(sanitized_filename("???"), "upload");
    }

    #[test]
    fn unique_filename_differs_per_call() {
        let first = unique_filename("essay.pdf");
        let second = unique_filename("essay.pdf");
        assert_ne!(first, second);
        assert!(first.ends_with("_essay.pdf"));
    }
}
