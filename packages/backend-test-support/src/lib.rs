//! Backend test support utilities
//!
//! This crate provides utilities specifically for backend testing, including
//! mock database connection management and unified logging initialization.

pub mod logging;
