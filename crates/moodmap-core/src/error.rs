//! # Error Types
//!
//! Domain-specific error types for moodmap-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  moodmap-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Draft / input validation failures              │
//! │                                                                         │
//! │  moodmap-cache errors (separate crate)                                 │
//! │  └── CacheError       - SQLite / payload failures                      │
//! │                                                                         │
//! │  moodmap-sync errors (separate crate)                                  │
//! │  └── SyncError        - Config, cache and runtime failures             │
//! │                                                                         │
//! │  None of these reach the caller of add_mood / update_settings /        │
//! │  resync: those record a message on AppState instead.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Mood name is not part of the fixed vocabulary.
    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    /// Theme name is not recognised.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a draft reaches the gateway, so an invalid entry never
/// becomes visible state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// Required field is empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Coordinate is not a finite number inside its range.
    #[error("{field} must be between {min} and {max} degrees")]
    InvalidCoordinate { field: String, min: f64, max: f64 },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
