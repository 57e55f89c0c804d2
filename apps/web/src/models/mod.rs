pub mod dashboard;
pub mod job;
pub mod user;
