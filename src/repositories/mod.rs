pub(crate) mod assignments;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod lessons;
pub(crate) mod submissions;
pub(crate) mod users;
