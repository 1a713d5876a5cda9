pub(crate) mod bridge;
pub(crate) mod project_file;
