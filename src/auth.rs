//! Application credentials plus the short-lived secrets the provider issues against them.

pub mod credential;
pub mod id;
pub mod secret;

pub use credential::*;
pub use id::*;
pub use secret::*;
