pub mod counter;
pub mod project;
