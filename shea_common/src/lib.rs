//! Primitives shared by every crate in the Shea Store workspace.
mod cents;
mod helpers;
mod secret;

pub mod op;

pub use cents::{Cents, CentsConversionError, DEFAULT_CURRENCY};
pub use helpers::{parse_boolean_flag, parse_list};
pub use secret::Secret;
