//! Logging macros for the decomposition pipeline with verbosity level control.
//!
//! Provides zero-cost logging when disabled (verbosity=0).
//! Levels:
//! - 0: SILENT
//! - 1: SUMMARY (device count, matching size, chain count)
//! - 2: STEPS (each augmenting path, each reconstructed chain)
//! - 3: DEBUG (BFS internals, individual pops)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_STEPS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at SUMMARY level (verbosity >= 1).
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SUMMARY {
            eprintln!($($arg)*);
        }
    };
}

/// Log at STEPS level (verbosity >= 2).
///
/// Used for: augmentations, chain reconstruction.
#[macro_export]
macro_rules! log_steps {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_STEPS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}
