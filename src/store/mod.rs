//! Durable store of learned (diff, message) examples keyed by scope.

pub mod examples;
pub mod persist;

pub use examples::{Example, ExampleStore, GLOBAL_SCOPE, Scope};
pub use persist::{APP_DIR, STORE_FILE, default_store_path};
