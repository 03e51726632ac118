//! Common utilities module
//!
//! This module contains shared utilities used across the augmentation pipeline.

pub mod error;

pub use error::{AugmentError, Result};
