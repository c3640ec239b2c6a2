//! Steering policies and the model predictor seam.
//!
//! Once per tick each agent's selected [`PolicyKind`] is resolved to a
//! [`SteeringPolicy`], which looks at the agent, its opponent and the
//! per-tick [`PolicyContext`] and returns a [`Steering`] decision. A policy
//! that has nothing to say returns `None`; the step then leaves the heading
//! alone and re-applies the agent's previous throttle.
//!
//! The `automatic` policy defers to a [`Predictor`], an external model that
//! maps eight features (both agents' positions and velocities) to a thrust
//! rate and a heading expressed as a fraction of pi. Any predictor failure
//! is a soft fault for that tick.

use core::f64::consts::PI;

use pursuit_agents::{AGENT_FEATURES, Agent};
use pursuit_types::{PolicyKind, Vec2};
use pursuit_world::Board;
use tracing::warn;

/// Number of features handed to the predictor: self, then opponent.
pub const MODEL_FEATURES: usize = 2 * AGENT_FEATURES;

/// Where a decision points the agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aim {
    /// Head at a board position.
    Toward(Vec2),
    /// Set the heading directly, in radians.
    Heading(f64),
}

/// A steering decision for one agent for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    /// New heading.
    pub aim: Aim,
    /// Normalized thrust rate, clamped to `[-1, 1]` by the agent.
    pub rate: f64,
}

impl Steering {
    /// Full thrust toward `target`.
    pub const fn toward(target: Vec2) -> Self {
        Self {
            aim: Aim::Toward(target),
            rate: 1.0,
        }
    }
}

/// Read-only inputs a policy may consult besides the two agents.
#[derive(Clone, Copy)]
pub struct PolicyContext<'a> {
    /// Pointer position in board coordinates.
    pub pointer: Vec2,
    /// Board geometry, used to normalize model features.
    pub board: &'a Board,
    /// Model backend for the `automatic` policy, if one is attached.
    pub predictor: Option<&'a dyn Predictor>,
}

impl core::fmt::Debug for PolicyContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PolicyContext")
            .field("pointer", &self.pointer)
            .field("board", self.board)
            .field("predictor", &self.predictor.is_some())
            .finish()
    }
}

/// A rule that steers `me` given the opponent and the tick context.
pub trait SteeringPolicy: Send + Sync {
    /// Settings name of this policy.
    fn name(&self) -> &'static str;

    /// Decide this tick's heading and thrust, or `None` to leave the agent
    /// as it was.
    fn decide(&self, me: &Agent, other: &Agent, ctx: &PolicyContext<'_>) -> Option<Steering>;
}

/// Head straight at the opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chase;

impl SteeringPolicy for Chase {
    fn name(&self) -> &'static str {
        "chase"
    }

    fn decide(&self, _me: &Agent, other: &Agent, _ctx: &PolicyContext<'_>) -> Option<Steering> {
        Some(Steering::toward(other.position()))
    }
}

/// Head at the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseFollow;

impl SteeringPolicy for MouseFollow {
    fn name(&self) -> &'static str {
        "mouse"
    }

    fn decide(&self, _me: &Agent, _other: &Agent, ctx: &PolicyContext<'_>) -> Option<Steering> {
        Some(Steering::toward(ctx.pointer))
    }
}

/// Flee at a right angle to the line from the opponent.
///
/// The target is the own position offset by the opponent-to-self vector
/// rotated by +90 degrees: `(me.x + me.y - other.y, me.y + other.x - me.x)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dodge;

impl SteeringPolicy for Dodge {
    fn name(&self) -> &'static str {
        "dodge"
    }

    fn decide(&self, me: &Agent, other: &Agent, _ctx: &PolicyContext<'_>) -> Option<Steering> {
        let me = me.position();
        let other = other.position();
        Some(Steering::toward(Vec2::new(
            me.y - other.y + me.x,
            other.x - me.x + me.y,
        )))
    }
}

/// Flee directly away from the opponent: target `2 * me - other`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FleeRadially;

impl SteeringPolicy for FleeRadially {
    fn name(&self) -> &'static str {
        "run"
    }

    fn decide(&self, me: &Agent, other: &Agent, _ctx: &PolicyContext<'_>) -> Option<Steering> {
        let me = me.position();
        Some(Steering::toward(me + me - other.position()))
    }
}

/// Ask the attached [`Predictor`] for rate and heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelDriven;

impl SteeringPolicy for ModelDriven {
    fn name(&self) -> &'static str {
        "automatic"
    }

    fn decide(&self, me: &Agent, other: &Agent, ctx: &PolicyContext<'_>) -> Option<Steering> {
        let predictor = ctx.predictor?;
        let features = model_features(me, other, ctx.board);

        match predictor.predict(&features) {
            Ok([rate, heading_fraction]) if rate.is_finite() && heading_fraction.is_finite() => {
                Some(Steering {
                    aim: Aim::Heading(heading_fraction * PI),
                    rate,
                })
            }
            Ok(output) => {
                warn!(role = %me.role(), ?output, "Predictor returned non-finite output, skipping");
                None
            }
            Err(e) => {
                warn!(role = %me.role(), error = %e, "Predictor failed, skipping");
                None
            }
        }
    }
}

/// Resolve a settings value to its policy. Unrecognized settings have no
/// policy.
pub fn policy_for(kind: PolicyKind) -> Option<&'static dyn SteeringPolicy> {
    match kind {
        PolicyKind::Chase => Some(&Chase),
        PolicyKind::Mouse => Some(&MouseFollow),
        PolicyKind::Dodge => Some(&Dodge),
        PolicyKind::Run => Some(&FleeRadially),
        PolicyKind::Automatic => Some(&ModelDriven),
        PolicyKind::Unrecognized => None,
    }
}

/// Predictor input: `me`'s exported features followed by `other`'s.
pub fn model_features(me: &Agent, other: &Agent, board: &Board) -> [f64; MODEL_FEATURES] {
    let [ax, ay, avx, avy] = me.export(board);
    let [bx, by, bvx, bvy] = other.export(board);
    [ax, ay, avx, avy, bx, by, bvx, bvy]
}

// ---------------------------------------------------------------------------
// Predictor seam
// ---------------------------------------------------------------------------

/// Errors a model backend can report.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// The backend could not produce a prediction.
    #[error("model backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

/// External model mapping eight features to `[rate, heading_fraction]`.
///
/// `heading_fraction * pi` becomes the heading; `rate` is the normalized
/// thrust.
pub trait Predictor: Send + Sync {
    /// Run the model once.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError`] if the backend fails. The caller treats
    /// this as a no-op for the tick.
    fn predict(&self, features: &[f64; MODEL_FEATURES]) -> Result<[f64; 2], PredictError>;
}

/// Adapts a closure into a [`Predictor`].
pub struct FnPredictor<F>(pub F);

impl<F> Predictor for FnPredictor<F>
where
    F: Fn(&[f64; MODEL_FEATURES]) -> Result<[f64; 2], PredictError> + Send + Sync,
{
    fn predict(&self, features: &[f64; MODEL_FEATURES]) -> Result<[f64; 2], PredictError> {
        (self.0)(features)
    }
}

impl<F> core::fmt::Debug for FnPredictor<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("FnPredictor")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp)]
mod tests {
    use pursuit_agents::KinematicsConfig;
    use pursuit_types::Role;

    use super::*;

    const EPS: f64 = 1e-12;

    fn agent(role: Role, x: f64, y: f64) -> Agent {
        Agent::new(
            role,
            Vec2::new(x, y),
            Vec2::ZERO,
            &KinematicsConfig::default(),
            "#000000",
        )
        .unwrap()
    }

    fn ctx<'a>(board: &'a Board, predictor: Option<&'a dyn Predictor>) -> PolicyContext<'a> {
        PolicyContext {
            pointer: Vec2::new(12.0, -34.0),
            board,
            predictor,
        }
    }

    fn target(steering: Option<Steering>) -> Vec2 {
        match steering.unwrap().aim {
            Aim::Toward(t) => t,
            Aim::Heading(h) => panic!("expected a target, got heading {h}"),
        }
    }

    #[test]
    fn chase_targets_opponent_at_full_rate() {
        let board = Board::default();
        let chaser = agent(Role::Chaser, 0.0, 0.0);
        let runner = agent(Role::Runner, 100.0, 50.0);
        let decision = Chase.decide(&chaser, &runner, &ctx(&board, None));
        assert_eq!(decision.unwrap().rate, 1.0);
        assert_eq!(target(decision), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn mouse_targets_pointer() {
        let board = Board::default();
        let chaser = agent(Role::Chaser, 0.0, 0.0);
        let runner = agent(Role::Runner, 100.0, 50.0);
        let decision = MouseFollow.decide(&chaser, &runner, &ctx(&board, None));
        assert_eq!(target(decision), Vec2::new(12.0, -34.0));
    }

    #[test]
    fn dodge_target_is_perpendicular_to_threat() {
        let board = Board::default();
        let runner = agent(Role::Runner, 10.0, 20.0);
        let chaser = agent(Role::Chaser, 0.0, 0.0);
        let t = target(Dodge.decide(&runner, &chaser, &ctx(&board, None)));
        // (ry - cy + rx, cx - rx + ry)
        assert_eq!(t, Vec2::new(30.0, 10.0));

        let threat = runner.position() - chaser.position();
        let flee = t - runner.position();
        assert!((threat.x * flee.x + threat.y * flee.y).abs() < EPS);
    }

    #[test]
    fn run_target_is_reflection_of_opponent() {
        let board = Board::default();
        let runner = agent(Role::Runner, 10.0, 20.0);
        let chaser = agent(Role::Chaser, -5.0, 0.0);
        let t = target(FleeRadially.decide(&runner, &chaser, &ctx(&board, None)));
        assert_eq!(t, Vec2::new(25.0, 40.0));
    }

    #[test]
    fn model_features_encode_self_then_other() {
        let board = Board::default();
        let me = Agent::new(
            Role::Runner,
            Vec2::new(250.0, -500.0),
            Vec2::new(5.0, -2.5),
            &KinematicsConfig::default(),
            "#0000ff",
        )
        .unwrap();
        let other = agent(Role::Chaser, -500.0, 0.0);
        let features = model_features(&me, &other, &board);
        let expected = [0.5, -1.0, 1.0, -0.5, -1.0, 0.0, 0.0, 0.0];
        for (got, want) in features.iter().zip(expected) {
            assert!((got - want).abs() < EPS, "{features:?}");
        }
    }

    #[test]
    fn automatic_sets_heading_from_fraction() {
        let board = Board::default();
        let predictor = FnPredictor(|_: &[f64; MODEL_FEATURES]| -> Result<[f64; 2], PredictError> {
            Ok([0.5, 0.5])
        });
        let me = agent(Role::Chaser, 0.0, 0.0);
        let other = agent(Role::Runner, 1.0, 1.0);
        let decision = ModelDriven
            .decide(&me, &other, &ctx(&board, Some(&predictor)))
            .unwrap();
        assert_eq!(decision.rate, 0.5);
        match decision.aim {
            Aim::Heading(h) => assert!((h - PI / 2.0).abs() < EPS),
            Aim::Toward(t) => panic!("expected heading, got target {t:?}"),
        }
    }

    #[test]
    fn automatic_passes_features_to_predictor() {
        let board = Board::default();
        let predictor = FnPredictor(|features: &[f64; MODEL_FEATURES]| -> Result<[f64; 2], PredictError> {
            let [x, ..] = *features;
            Ok([x, 0.0])
        });
        let me = agent(Role::Chaser, 250.0, 0.0);
        let other = agent(Role::Runner, 0.0, 0.0);
        let decision = ModelDriven
            .decide(&me, &other, &ctx(&board, Some(&predictor)))
            .unwrap();
        assert!((decision.rate - 0.5).abs() < EPS);
    }

    #[test]
    fn automatic_without_predictor_is_noop() {
        let board = Board::default();
        let me = agent(Role::Chaser, 0.0, 0.0);
        let other = agent(Role::Runner, 1.0, 1.0);
        assert!(ModelDriven.decide(&me, &other, &ctx(&board, None)).is_none());
    }

    #[test]
    fn automatic_failures_are_noops() {
        let board = Board::default();
        let me = agent(Role::Chaser, 0.0, 0.0);
        let other = agent(Role::Runner, 1.0, 1.0);

        let failing = FnPredictor(|_: &[f64; MODEL_FEATURES]| -> Result<[f64; 2], PredictError> {
            Err(PredictError::Backend {
                message: "offline".to_owned(),
            })
        });
        assert!(
            ModelDriven
                .decide(&me, &other, &ctx(&board, Some(&failing)))
                .is_none()
        );

        let nan = FnPredictor(|_: &[f64; MODEL_FEATURES]| -> Result<[f64; 2], PredictError> {
            Ok([f64::NAN, 0.0])
        });
        assert!(ModelDriven.decide(&me, &other, &ctx(&board, Some(&nan))).is_none());
    }

    #[test]
    fn policy_lookup_matches_names() {
        for kind in [
            PolicyKind::Chase,
            PolicyKind::Mouse,
            PolicyKind::Dodge,
            PolicyKind::Run,
            PolicyKind::Automatic,
        ] {
            assert_eq!(policy_for(kind).unwrap().name(), kind.as_str());
        }
        assert!(policy_for(PolicyKind::Unrecognized).is_none());
    }
}
