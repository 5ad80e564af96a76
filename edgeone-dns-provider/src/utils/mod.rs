//! Utility modules.

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;

/// Absolute/relative DNS name conversion.
pub mod names;
