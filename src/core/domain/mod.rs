//! Domain types.

mod secret;

pub use secret::{Malformed, Secret};
