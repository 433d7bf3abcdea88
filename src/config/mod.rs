// src/config/mod.rs

//! Runtime settings for devloop.
//!
//! There is no config file: everything comes from the command line.
//! - `model.rs` holds the validated settings types.
//! - `validate.rs` turns parsed CLI arguments into [`Settings`].

pub mod model;
pub mod validate;

pub use model::{Debounce, Settings};
