use thiserror::Error;

/// Library-level failures. Terminal simulation outcomes (extinction, stall,
/// turn-budget exhaustion) are statuses, not errors; see `life::Status`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Rejected at construction, before any simulation state exists.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Cell access outside `[0, size)` in either coordinate.
    #[error("cell ({row}, {col}) out of range for a {size}x{size} board")]
    OutOfRange { row: usize, col: usize, size: usize },

    /// Cell values are binary; anything but 0 or 1 is caller error.
    #[error("cell value {0} is not 0 or 1")]
    InvalidValue(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
