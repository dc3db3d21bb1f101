//! Application services layer.

pub mod cache;
pub mod counter;
pub mod error;
pub mod health;
pub mod repos;
pub mod users;
