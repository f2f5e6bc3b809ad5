pub mod auth;
pub mod category;
pub mod media;
pub mod project;
pub mod service_step;
