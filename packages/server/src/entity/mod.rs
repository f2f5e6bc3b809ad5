pub mod category;
pub mod project;
pub mod service_step;
pub mod stored_file;
pub mod user;
