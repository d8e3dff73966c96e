// =============================================================================
// Engine errors
// =============================================================================
//
// Missing data is never an error: it is carried as `None` through every
// indicator and classification.  The variants here are contract violations at
// the call boundary, reported instead of silently truncating input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Parallel high/low/close series must be index-aligned.
    #[error("series length mismatch: highs={highs}, lows={lows}, closes={closes}")]
    SeriesLengthMismatch {
        highs: usize,
        lows: usize,
        closes: usize,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
