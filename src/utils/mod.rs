//! Utility Functions
//!
//! User-friendly error formatting for the command line tool.
//!
//! ## Error Formatting
//!
//! The [`errors`] module provides user-friendly error messages:
//!
//! ```rust,ignore
//! use lamco_display_layout::utils::format_user_error;
//!
//! match operation() {
//!     Err(e) => {
//!         eprintln!("{}", format_user_error(&e));
//!         // Shows:
//!         // - Formatted error with box drawing
//!         // - Context-specific troubleshooting steps
//!         // - Technical details
//!     }
//! }
//! ```
//!
//! Error categories with context-aware help:
//! - Snapshot errors → file location, TOML format, primary display count
//! - Drag script errors → expected JSON event format
//! - Config errors → syntax, value ranges
//! - Topology errors → missing parents, loops, lone primary
//! - Dimension errors → zero-sized displays

pub mod errors;

pub use errors::format_user_error;
