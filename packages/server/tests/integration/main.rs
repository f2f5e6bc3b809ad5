mod category;
mod project;
mod service_step;
