//! Utility functions used throughout the crate
//!
//! This module contains the base64 codec the data-URL layer is built on.

pub mod base64;

// Re-export commonly used utilities
pub use self::base64::{decode_base64, encode_base64};
