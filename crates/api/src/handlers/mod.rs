pub mod assignment;
pub mod auth;
pub mod health;
pub mod project;
pub mod review;
pub mod task;
pub mod user;
