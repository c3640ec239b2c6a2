//! Soft boundary force field.
//!
//! Instead of walls, each edge of the safe-zone rectangle is backed by a
//! "ramp": a band of width `ramp_width` inside the edge where agents feel an
//! acceleration pointing back toward the interior. The push is zero at the
//! inner edge of the band and grows hyperbolically toward the boundary line,
//! capped at `max_push = ramp_width / 30`.
//!
//! # Slope
//!
//! For a distance `d` measured from the boundary line into the safe zone:
//!
//! | Distance              | Push                                              |
//! |-----------------------|---------------------------------------------------|
//! | `d > ramp_width`      | `0`                                               |
//! | `0 < d <= ramp_width` | `min(max_push, ramp_strength * (ramp_width/d - 1))` |
//! | `d <= 0`              | `max_push`                                        |
//!
//! Each axis is handled independently: the push from the near edge minus the
//! push from the opposite edge. The field is a pure function of position; it
//! is added into velocity, never into position.

use pursuit_types::{BoundaryView, BoundsRect, Vec2};

use crate::board::Board;
use crate::error::WorldError;

/// Default ramp width as a fraction of the board size.
pub const DEFAULT_RAMP_FRACTION: f64 = 0.2;

/// Default ramp steepness.
pub const DEFAULT_RAMP_STRENGTH: f64 = 0.05;

/// `max_push = ramp_width / MAX_PUSH_DIVISOR`.
const MAX_PUSH_DIVISOR: f64 = 30.0;

/// Immutable boundary configuration with a derived maximum push.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryField {
    /// The safe-zone rectangle.
    bounds: BoundsRect,
    /// Width of the ramp band inside each edge.
    ramp_width: f64,
    /// Steepness of the hyperbolic ramp.
    ramp_strength: f64,
    /// Cap on the push from a single edge.
    max_push: f64,
}

impl BoundaryField {
    /// Build a field over `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidBoundary`] if the rectangle is empty or
    /// non-finite, or if `ramp_width` or `ramp_strength` is not a positive
    /// finite number.
    pub fn new(bounds: BoundsRect, ramp_width: f64, ramp_strength: f64) -> Result<Self, WorldError> {
        let edges = [bounds.top, bounds.right, bounds.bottom, bounds.left];
        if edges.iter().any(|edge| !edge.is_finite()) {
            return Err(WorldError::InvalidBoundary {
                reason: "bounds must be finite".to_owned(),
            });
        }
        if bounds.left >= bounds.right || bounds.top >= bounds.bottom {
            return Err(WorldError::InvalidBoundary {
                reason: format!(
                    "bounds must satisfy left < right and top < bottom (got {bounds:?})"
                ),
            });
        }
        if !ramp_width.is_finite() || ramp_width <= 0.0 {
            return Err(WorldError::InvalidBoundary {
                reason: format!("ramp_width must be positive (got {ramp_width})"),
            });
        }
        if !ramp_strength.is_finite() || ramp_strength <= 0.0 {
            return Err(WorldError::InvalidBoundary {
                reason: format!("ramp_strength must be positive (got {ramp_strength})"),
            });
        }

        Ok(Self {
            bounds,
            ramp_width,
            ramp_strength,
            max_push: ramp_width / MAX_PUSH_DIVISOR,
        })
    }

    /// Build a field whose safe zone is the whole board, with a ramp
    /// `ramp_fraction * board.size()` wide.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidBoundary`] if the resulting ramp
    /// parameters are not positive.
    pub fn for_board(
        board: &Board,
        ramp_fraction: f64,
        ramp_strength: f64,
    ) -> Result<Self, WorldError> {
        Self::new(board.bounds(), board.size() * ramp_fraction, ramp_strength)
    }

    /// The safe-zone rectangle.
    pub const fn bounds(&self) -> BoundsRect {
        self.bounds
    }

    /// Width of the ramp band.
    pub const fn ramp_width(&self) -> f64 {
        self.ramp_width
    }

    /// Ramp steepness.
    pub const fn ramp_strength(&self) -> f64 {
        self.ramp_strength
    }

    /// Largest push a single edge can apply.
    pub const fn max_push(&self) -> f64 {
        self.max_push
    }

    /// Push exerted by one edge on an agent `distance` inside it.
    pub fn slope(&self, distance: f64) -> f64 {
        if distance > self.ramp_width {
            return 0.0;
        }
        if distance <= 0.0 {
            return self.max_push;
        }
        self.max_push
            .min(self.ramp_strength * (self.ramp_width / distance - 1.0))
    }

    /// Acceleration the boundary applies to an agent at `position`.
    ///
    /// Positive `x` pushes right, positive `y` pushes down; near the left
    /// or top edge the field points into the rectangle.
    pub fn acceleration(&self, position: Vec2) -> Vec2 {
        let b = &self.bounds;
        Vec2::new(
            self.slope(position.x - b.left) - self.slope(b.right - position.x),
            self.slope(position.y - b.top) - self.slope(b.bottom - position.y),
        )
    }

    /// Render-facing description of the field.
    pub const fn view(&self) -> BoundaryView {
        BoundaryView {
            bounds: self.bounds,
            ramp_width: self.ramp_width,
            ramp_strength: self.ramp_strength,
            max_push: self.max_push,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn classic_field() -> BoundaryField {
        BoundaryField::for_board(&Board::default(), DEFAULT_RAMP_FRACTION, DEFAULT_RAMP_STRENGTH)
            .unwrap()
    }

    #[test]
    fn classic_field_parameters() {
        let field = classic_field();
        assert!((field.ramp_width() - 200.0).abs() < EPS);
        assert!((field.max_push() - 200.0 / 30.0).abs() < EPS);
    }

    #[test]
    fn slope_at_line_is_exactly_max_push() {
        let field = classic_field();
        let at_line = field.slope(0.0);
        assert!(at_line.is_finite());
        assert_eq!(at_line.to_bits(), field.max_push().to_bits());
    }

    #[test]
    fn slope_past_line_is_clamped() {
        let field = classic_field();
        assert_eq!(field.slope(-50.0).to_bits(), field.max_push().to_bits());
        assert_eq!(field.slope(-1e9).to_bits(), field.max_push().to_bits());
    }

    #[test]
    fn slope_is_continuous_at_ramp_width() {
        let field = classic_field();
        let w = field.ramp_width();
        assert!(field.slope(w).abs() < EPS);
        assert!(field.slope(w + 1e-9).abs() < EPS);
        assert!(field.slope(w - 1e-9).abs() < 1e-9);
    }

    #[test]
    fn slope_is_monotonically_non_increasing_inside_ramp() {
        let field = classic_field();
        let w = field.ramp_width();
        let mut previous = f64::INFINITY;
        for step in 1..=2000_u32 {
            let d = w * f64::from(step) / 2000.0;
            let s = field.slope(d);
            assert!(s <= previous, "slope increased at d = {d}");
            assert!(s >= 0.0);
            assert!(s <= field.max_push());
            previous = s;
        }
    }

    #[test]
    fn slope_hyperbola_in_uncapped_region() {
        let field = classic_field();
        // 0.05 * (200 / 100 - 1) = 0.05, well below max_push.
        assert!((field.slope(100.0) - 0.05).abs() < EPS);
    }

    #[test]
    fn center_of_large_rectangle_feels_nothing() {
        let field = classic_field();
        let acc = field.acceleration(Vec2::ZERO);
        assert!(acc.x.abs() < EPS);
        assert!(acc.y.abs() < EPS);
        // Anywhere deeper than the ramp is also force-free.
        let acc = field.acceleration(Vec2::new(299.0, -299.0));
        assert!(acc.length() < EPS);
    }

    #[test]
    fn field_points_inward_near_each_edge() {
        let field = classic_field();
        assert!(field.acceleration(Vec2::new(-450.0, 0.0)).x > 0.0);
        assert!(field.acceleration(Vec2::new(450.0, 0.0)).x < 0.0);
        assert!(field.acceleration(Vec2::new(0.0, -450.0)).y > 0.0);
        assert!(field.acceleration(Vec2::new(0.0, 450.0)).y < 0.0);
    }

    #[test]
    fn agent_on_left_line_gets_max_push() {
        let field = classic_field();
        let acc = field.acceleration(Vec2::new(-500.0, 0.0));
        assert!(acc.x.is_finite());
        assert!((acc.x - field.max_push()).abs() < EPS);
        assert!(acc.y.abs() < EPS);
    }

    #[test]
    fn opposing_ramps_cancel_in_narrow_box() {
        let bounds = BoundsRect {
            top: -10.0,
            right: 10.0,
            bottom: 10.0,
            left: -10.0,
        };
        let field = BoundaryField::new(bounds, 50.0, 0.05).unwrap();
        let acc = field.acceleration(Vec2::ZERO);
        assert!(acc.length() < EPS);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let bounds = Board::default().bounds();
        assert!(BoundaryField::new(bounds, 0.0, 0.05).is_err());
        assert!(BoundaryField::new(bounds, 200.0, -1.0).is_err());
        assert!(BoundaryField::new(bounds, f64::NAN, 0.05).is_err());
        let inverted = BoundsRect {
            top: 10.0,
            right: 10.0,
            bottom: -10.0,
            left: -10.0,
        };
        assert!(BoundaryField::new(inverted, 5.0, 0.05).is_err());
    }

    #[test]
    fn view_mirrors_configuration() {
        let field = classic_field();
        let view = field.view();
        assert_eq!(view.bounds, field.bounds());
        assert!((view.max_push - field.max_push()).abs() < EPS);
    }
}
