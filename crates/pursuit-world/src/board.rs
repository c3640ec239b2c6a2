//! The board: a square play area centered on the origin.
//!
//! The board owns the scale-dependent constants of the game: the capture
//! distance, the transform from host pixel coordinates to board units, and
//! the normalization used when exporting agent state to a model.

use pursuit_types::{BoundsRect, Vec2};
use serde::Serialize;

use crate::error::WorldError;

/// Default edge length of the board in board units.
pub const DEFAULT_BOARD_SIZE: f64 = 1000.0;

/// Default capture distance as a fraction of the board size.
pub const DEFAULT_CAPTURE_FRACTION: f64 = 0.02;

/// Square board centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Board {
    /// Edge length in board units.
    size: f64,
    /// Capture distance as a fraction of `size`.
    capture_fraction: f64,
}

impl Board {
    /// Create a board of edge length `size`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidBoardSize`] if `size` is not positive
    /// and finite, or [`WorldError::InvalidCaptureFraction`] if the
    /// fraction is outside `(0, 1]`.
    pub fn new(size: f64, capture_fraction: f64) -> Result<Self, WorldError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(WorldError::InvalidBoardSize(size));
        }
        if !capture_fraction.is_finite() || capture_fraction <= 0.0 || capture_fraction > 1.0 {
            return Err(WorldError::InvalidCaptureFraction(capture_fraction));
        }
        Ok(Self {
            size,
            capture_fraction,
        })
    }

    /// Edge length.
    pub const fn size(&self) -> f64 {
        self.size
    }

    /// Half the edge length; the board spans `[-half, half]` on both axes.
    pub fn half_extent(&self) -> f64 {
        self.size / 2.0
    }

    /// The whole board as a rectangle.
    pub fn bounds(&self) -> BoundsRect {
        let half = self.half_extent();
        BoundsRect {
            top: -half,
            right: half,
            bottom: half,
            left: -half,
        }
    }

    /// Distance below which the chaser has caught the runner.
    pub fn capture_distance(&self) -> f64 {
        self.size * self.capture_fraction
    }

    /// Whether two agents `distance` apart count as a capture.
    pub fn is_capture(&self, distance: f64) -> bool {
        distance < self.capture_distance()
    }

    /// Map one host pixel coordinate onto the board.
    ///
    /// `coord / viewport * size - size / 2`: the viewport's left/top edge
    /// maps to `-half`, its far edge to `+half`. A non-positive viewport
    /// maps everything to the center.
    pub fn pixel_to_board(&self, coord: f64, viewport: f64) -> f64 {
        if viewport <= 0.0 || !viewport.is_finite() {
            return 0.0;
        }
        coord / viewport * self.size - self.half_extent()
    }

    /// Map a host pixel position inside a `viewport`-sized canvas onto the
    /// board.
    pub fn viewport_to_board(&self, pixel: Vec2, viewport: Vec2) -> Vec2 {
        Vec2::new(
            self.pixel_to_board(pixel.x, viewport.x),
            self.pixel_to_board(pixel.y, viewport.y),
        )
    }

    /// Scale a board position into `[-1, 1]` by the half extent.
    pub fn normalize(&self, position: Vec2) -> Vec2 {
        position * (1.0 / self.half_extent())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            capture_fraction: DEFAULT_CAPTURE_FRACTION,
        }
    }
}
