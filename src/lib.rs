//! Page-view counter service with a cache-aside read path.

pub mod application;
pub mod cache;
pub mod config;
pub mod context;
pub mod domain;
pub mod infra;
pub mod presentation;
