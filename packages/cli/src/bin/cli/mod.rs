pub mod billing;
pub mod generate;
pub mod projects;
