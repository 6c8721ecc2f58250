pub(crate) mod assignments;
pub(crate) mod auth;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod lessons;
pub(crate) mod router;
pub(crate) mod submissions;
