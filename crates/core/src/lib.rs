//! Core business logic for lingkod.

pub mod flow;
pub mod services;

pub use services::*;
