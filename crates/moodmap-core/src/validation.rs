//! # Validation Module
//!
//! Checks a [`MoodDraft`] must pass before it is offered to the gateway.
//!
//! ## Where It Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Draft Validation                                   │
//! │                                                                         │
//! │  UI form ──► MoodDraft ──► validate_draft() ──► pipeline ──► gateway   │
//! │                  │                │                                     │
//! │                  │                └── Err: HardFailure, nothing shown  │
//! │                  │                                                      │
//! │                  └── intensity already range-checked by Intensity::new │
//! │                                                                         │
//! │  A draft that fails here never becomes visible state, on either the    │
//! │  remote path or the local fallback path.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use moodmap_core::validation::validate_draft;
//! use moodmap_core::{Intensity, Location, MoodDraft, MoodName};
//!
//! let draft = MoodDraft::new(MoodName::Calm, Intensity::new(2).unwrap())
//!     .with_location(Location::new(48.85, 2.35));
//! assert!(validate_draft(&draft).is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{Location, MoodDraft};
use crate::MAX_NOTE_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates the free-text note.
///
/// Length is counted in characters, not bytes, so emoji-heavy notes get the
/// same allowance as plain text.
pub fn validate_note(note: &str) -> ValidationResult<()> {
    if note.chars().count() > MAX_NOTE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: MAX_NOTE_LENGTH,
        });
    }
    Ok(())
}

/// Validates the emoji glyph: non-empty after trimming, at most 16 chars.
pub fn validate_emoji(emoji: &str) -> ValidationResult<()> {
    let emoji = emoji.trim();
    if emoji.is_empty() {
        return Err(ValidationError::Required {
            field: "emoji".to_string(),
        });
    }
    if emoji.chars().count() > 16 {
        return Err(ValidationError::TooLong {
            field: "emoji".to_string(),
            max: 16,
        });
    }
    Ok(())
}

/// Validates a coordinate pair.
pub fn validate_location(location: &Location) -> ValidationResult<()> {
    check_coordinate("latitude", location.latitude, 90.0)?;
    check_coordinate("longitude", location.longitude, 180.0)?;
    Ok(())
}

fn check_coordinate(field: &str, value: f64, bound: f64) -> ValidationResult<()> {
    // NaN fails the range check too.
    if !(value.is_finite() && (-bound..=bound).contains(&value)) {
        return Err(ValidationError::InvalidCoordinate {
            field: field.to_string(),
            min: -bound,
            max: bound,
        });
    }
    Ok(())
}

// =============================================================================
// Draft Validator
// =============================================================================

/// Validates every user-supplied field of a draft.
pub fn validate_draft(draft: &MoodDraft) -> ValidationResult<()> {
    validate_emoji(&draft.emoji)?;
    if let Some(note) = &draft.note {
        validate_note(note)?;
    }
    if let Some(location) = &draft.location {
        validate_location(location)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
