//! Request handlers.

pub mod analytics;
pub mod health;

pub use analytics::*;
pub use health::*;
