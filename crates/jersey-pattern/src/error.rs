//! Error types for jersey-pattern.

use jersey_color::HexError;
use thiserror::Error;

/// Errors from deriving, validating or editing pattern parameters.
///
/// The per-pixel pipeline never produces these; they surface only where
/// external data enters or where a user edit is rejected.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// A club or stop color is not a valid `#RRGGBB` string.
    #[error("invalid color at {index}: {source}")]
    InvalidColor {
        index: usize,
        #[source]
        source: HexError,
    },

    /// A color string supplied directly to an edit.
    #[error("invalid color: {0}")]
    Hex(#[from] HexError),

    /// The career has no clubs.
    #[error("career has no clubs")]
    EmptyCareer,

    /// The parameters carry no color stops.
    #[error("no color stops")]
    NoStops,

    /// A percentage is negative, above 100 or not a number.
    #[error("invalid percentage at {index}: {value}")]
    InvalidPercentage { index: usize, value: f32 },

    /// The proportions would add up to more than 100%.
    #[error("total cannot exceed 100% (would be {total:.1}%, others sum to {others:.1}%)")]
    TotalExceeded { total: f32, others: f32 },

    /// A career or palette whose percentages add up to more than 100%.
    #[error("percentages cannot exceed 100% (sum to {total:.1}%)")]
    SumExceeded { total: f32 },

    /// An edit referenced a stop that does not exist.
    #[error("stop index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Adding a stop would exceed the palette cap.
    #[error("maximum {max} colors allowed")]
    TooManyStops { max: usize },

    /// Removing a stop would go below the palette minimum.
    #[error("at least {min} colors required")]
    TooFewStops { min: usize },

    /// A team color record is not of the form `#RRGGBB(P%)`.
    #[error("malformed team color record: {0:?}")]
    InvalidRecord(String),

    /// Halftone pattern code outside 0-3.
    #[error("unknown halftone pattern {0}")]
    UnknownPattern(u8),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
