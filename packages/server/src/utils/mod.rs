pub mod deadline;
pub mod filename;
pub mod hash;
pub mod jwt;
