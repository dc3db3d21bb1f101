//! HTML presentation.

pub mod views;
