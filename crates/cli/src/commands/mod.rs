pub mod build;
pub mod init;
pub mod posts;
pub mod preview;
pub mod project;
pub mod routes;
pub mod validate;
