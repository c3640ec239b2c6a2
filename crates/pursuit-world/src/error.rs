//! Error types for the `pursuit-world` crate.
//!
//! Every operation on a constructed [`Board`] or [`BoundaryField`] is
//! infallible; errors only arise when building one from configuration.
//!
//! [`Board`]: crate::board::Board
//! [`BoundaryField`]: crate::boundary::BoundaryField

/// Errors that can occur while constructing world geometry.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The board size is not a positive finite number.
    #[error("invalid board size: {0}")]
    InvalidBoardSize(f64),

    /// The capture fraction is outside `(0, 1]`.
    #[error("invalid capture fraction: {0} (expected 0 < fraction <= 1)")]
    InvalidCaptureFraction(f64),

    /// The boundary field parameters are unusable.
    #[error("invalid boundary: {reason}")]
    InvalidBoundary {
        /// Explanation of what is wrong with the boundary.
        reason: String,
    },
}
