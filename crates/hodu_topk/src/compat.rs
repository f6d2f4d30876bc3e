//! std/no-std compatibility layer
//!
//! Internal module for handling differences between std and no-std environments.

#[cfg(not(feature = "std"))]
pub use alloc::{
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

#[cfg(feature = "std")]
pub use std::{
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

pub use core::fmt;
