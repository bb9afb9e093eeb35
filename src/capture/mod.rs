//! Interactive region capture.
//!
//! This module provides:
//! - The per-desktop screenshot tool invocation (`screenshot_command`)
//! - Region capture to the fixed screenshot path (`capture_region`)

pub mod screenshot;

pub use screenshot::capture_region;
