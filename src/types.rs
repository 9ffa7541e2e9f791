//! Common types used throughout vcd-netquery
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Error Policy
// ============================================================================

/// What a call site does when its request comes back with an unexpected status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the run with the error
    #[default]
    Fail,
    /// Log the error and carry on
    Report,
}

impl ErrorPolicy {
    /// Map a fail-fast toggle onto a policy
    pub fn from_fail_fast(fail_fast: bool) -> Self {
        if fail_fast {
            Self::Fail
        } else {
            Self::Report
        }
    }

    /// Should the error abort the run?
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail)
    }
}

// ============================================================================
// Log Level
// ============================================================================

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
}

impl LogLevel {
    /// Level for the `-v` count given on the command line
    pub fn from_verbosity(verbose: u8) -> Self {
        match verbose {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_policy_from_fail_fast() {
        assert_eq!(ErrorPolicy::from_fail_fast(true), ErrorPolicy::Fail);
        assert_eq!(ErrorPolicy::from_fail_fast(false), ErrorPolicy::Report);
        assert!(ErrorPolicy::default().is_fail());
    }

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(1), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(5), LogLevel::Trace);
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
    }
}
