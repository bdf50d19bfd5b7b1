pub mod assignment;
pub mod project;
pub mod review;
pub mod task;
pub mod user;
