//! Turtle state and the command set it executes.

use crate::error::{Result, TurtleError};
use crate::frame::{Axis, BranchStack, OrientationFrame, StackKind};
use crate::primitive::{Edge, NamedObject, Primitive, Quad};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Relative change applied to the frame vectors by `!` and `@`.
pub const EXPAND_SHRINK_FACTOR: f32 = 0.1;
/// Relative change applied to the radius by `#` and `%`.
pub const FATTEN_SLINK_FACTOR: f32 = 0.045;
/// Relative change applied to the frame vectors by `*`.
pub const EXPAND_SHRINK_FACTOR_G: f32 = 0.2;
/// Relative change applied to the radius by `=` and `|`.
pub const FATTEN_SLINK_FACTOR_G: f32 = 0.48;
/// Factor used by `^`. It does not follow `EXPAND_SHRINK_FACTOR_G` and ignores any value.
pub const EXPAND_G_FIXED_FACTOR: f32 = 1.48;
/// Spread in degrees of the random perturbation `&` when no value is given.
pub const DEFAULT_PERTURBATION: f32 = 30.0;

/// Construction-time settings for a [`Turtle`].
///
/// Angles are in radians. Missing fields fall back to their defaults when deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleConfig {
    /// Direction of the external bias applied before each forward move. Normalized by
    /// the turtle; a zero vector disables tropism.
    pub tropism: Vec3,
    /// Strength of the tropism bias.
    pub tropism_magnitude: f32,
    /// Angle used by `+` and `-`.
    pub pitch_angle: f32,
    /// Angle used by `/` and `\`.
    pub yaw_angle: f32,
    /// Angle used by `<` and `>`.
    pub roll_angle: f32,
    /// Initial segment radius.
    pub radius: f32,
    /// Seed for the random perturbation command.
    pub seed: u64,
    /// Report an unterminated `{name` at end of input as
    /// [`TurtleError::MalformedName`] instead of dropping it.
    pub strict_names: bool,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            tropism: Vec3::ZERO,
            tropism_magnitude: 0.0,
            pitch_angle: 30.0f32.to_radians(),
            yaw_angle: 30.0f32.to_radians(),
            roll_angle: 30.0f32.to_radians(),
            radius: 0.2,
            seed: 42,
            strict_names: false,
        }
    }
}

impl TurtleConfig {
    pub fn with_tropism(mut self, direction: Vec3, magnitude: f32) -> Self {
        self.tropism = direction;
        self.tropism_magnitude = magnitude;
        self
    }

    /// Sets pitch, yaw and roll to the same angle, given in degrees.
    pub fn with_angle_degrees(mut self, degrees: f32) -> Self {
        let angle = degrees.to_radians();
        self.pitch_angle = angle;
        self.yaw_angle = angle;
        self.roll_angle = angle;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_strict_names(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }
}

/// Operations the turtle can perform.
///
/// Variants that take an `f32` carry the sign (rotations) or the default factor
/// (scalings) of the symbol they are bound to; an explicit value passed to
/// [`Turtle::apply`] replaces the configured angle or the default factor.
#[derive(Clone, Debug, PartialEq)]
pub enum TurtleOp {
    /// Rotate forward and up around right (`+` / `-`).
    Pitch(f32),
    /// Rotate forward and right around up (`/` / `\`).
    Yaw(f32),
    /// Rotate up and right around forward (`<` / `>`).
    Roll(f32),
    /// Random pitch followed by a random yaw (`&`).
    Perturb,
    /// Save the frame onto a stack (`[` / `(`).
    Push(StackKind),
    /// Restore the frame from a stack (`]` / `)`).
    Pop(StackKind),
    /// Scale the frame vectors (`!`, `@`, `*`).
    ScaleVectors(f32),
    /// Scale the frame vectors by a factor that no value can override (`^`).
    ScaleVectorsFixed(f32),
    /// Scale the radius (`#`, `%`, `=`, `|`).
    ScaleRadius(f32),
    /// Move forward and emit an [`Edge`] (`F`).
    Edge,
    /// Emit a [`Quad`] at the current frame (`Q`).
    Quad,
    /// Move forward and emit a [`NamedObject`] with this name (`{name}`).
    Object(String),
    /// No-op for symbols without a meaning.
    Ignore,
}

/// Looks up the standard meaning of a single-character symbol.
///
/// Returns `None` for characters that are not commands. Named objects are not in this
/// table; they come from the `{...}` syntax handled by the string scanner.
pub fn command_for(symbol: char) -> Option<TurtleOp> {
    let op = match symbol {
        '+' => TurtleOp::Pitch(1.0),
        '-' => TurtleOp::Pitch(-1.0),
        '/' => TurtleOp::Yaw(1.0),
        '\\' => TurtleOp::Yaw(-1.0),
        '<' => TurtleOp::Roll(1.0),
        '>' => TurtleOp::Roll(-1.0),
        '&' => TurtleOp::Perturb,
        '[' => TurtleOp::Push(StackKind::Branch),
        ']' => TurtleOp::Pop(StackKind::Branch),
        '(' => TurtleOp::Push(StackKind::Curly),
        ')' => TurtleOp::Pop(StackKind::Curly),
        '!' => TurtleOp::ScaleVectors(1.0 + EXPAND_SHRINK_FACTOR),
        '@' => TurtleOp::ScaleVectors(1.0 - EXPAND_SHRINK_FACTOR),
        '^' => TurtleOp::ScaleVectorsFixed(EXPAND_G_FIXED_FACTOR),
        '*' => TurtleOp::ScaleVectors(1.0 - EXPAND_SHRINK_FACTOR_G),
        '#' => TurtleOp::ScaleRadius(1.0 + FATTEN_SLINK_FACTOR),
        '%' => TurtleOp::ScaleRadius(1.0 - FATTEN_SLINK_FACTOR),
        '=' => TurtleOp::ScaleRadius(1.0 + FATTEN_SLINK_FACTOR_G),
        '|' => TurtleOp::ScaleRadius(1.0 - FATTEN_SLINK_FACTOR_G),
        'F' => TurtleOp::Edge,
        'Q' => TurtleOp::Quad,
        _ => return None,
    };
    Some(op)
}

/// A 3D turtle that turns commands into [`Primitive`]s.
///
/// The turtle owns its frame, both save/restore stacks and its random generator, so two
/// turtles built from the same [`TurtleConfig`] produce the same output for the same input.
#[derive(Clone, Debug)]
pub struct Turtle {
    frame: OrientationFrame,
    branch_stack: BranchStack,
    curly_stack: BranchStack,
    tropism: Vec3,
    tropism_magnitude: f32,
    pitch_angle: f32,
    yaw_angle: f32,
    roll_angle: f32,
    strict_names: bool,
    rng: StdRng,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new(TurtleConfig::default())
    }
}

impl Turtle {
    /// Creates a turtle at the origin heading along +X with +Z up.
    pub fn new(config: TurtleConfig) -> Self {
        Self {
            frame: OrientationFrame::new(config.radius),
            branch_stack: BranchStack::new(StackKind::Branch),
            curly_stack: BranchStack::new(StackKind::Curly),
            tropism: config.tropism.normalize_or_zero(),
            tropism_magnitude: config.tropism_magnitude,
            pitch_angle: config.pitch_angle,
            yaw_angle: config.yaw_angle,
            roll_angle: config.roll_angle,
            strict_names: config.strict_names,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// The live orientation frame.
    pub fn frame(&self) -> &OrientationFrame {
        &self.frame
    }

    /// Number of snapshots currently held by the given stack.
    pub fn stack_depth(&self, kind: StackKind) -> usize {
        self.stack(kind).len()
    }

    pub(crate) fn strict_names(&self) -> bool {
        self.strict_names
    }

    fn stack(&self, kind: StackKind) -> &BranchStack {
        match kind {
            StackKind::Branch => &self.branch_stack,
            StackKind::Curly => &self.curly_stack,
        }
    }

    fn stack_mut(&mut self, kind: StackKind) -> &mut BranchStack {
        match kind {
            StackKind::Branch => &mut self.branch_stack,
            StackKind::Curly => &mut self.curly_stack,
        }
    }

    /// Executes one command.
    ///
    /// `value` overrides the command's default: degrees for rotations and the spread of
    /// `&`, a multiplication factor for scalings. It is ignored by commands that take no
    /// parameter and by [`TurtleOp::ScaleVectorsFixed`].
    ///
    /// Returns the primitive the command emits, if any.
    ///
    /// # Errors
    ///
    /// [`TurtleError::StackUnderflow`] when popping an empty stack. The frame is left
    /// unchanged in that case.
    pub fn apply(&mut self, op: &TurtleOp, value: Option<f32>) -> Result<Option<Primitive>> {
        trace!(?op, ?value, "turtle command");
        let angle = |default: f32| value.map(f32::to_radians).unwrap_or(default);

        match op {
            TurtleOp::Pitch(sign) => {
                let a = angle(self.pitch_angle);
                self.frame.rotate(Axis::Right, a * sign);
            }
            TurtleOp::Yaw(sign) => {
                let a = angle(self.yaw_angle);
                self.frame.rotate(Axis::Up, a * sign);
            }
            TurtleOp::Roll(sign) => {
                let a = angle(self.roll_angle);
                self.frame.rotate(Axis::Forward, a * sign);
            }
            TurtleOp::Perturb => {
                let spread = value.unwrap_or(DEFAULT_PERTURBATION);
                let pitch = (self.rng.random::<f32>() - 0.5) * spread;
                self.apply(&TurtleOp::Pitch(1.0), Some(pitch))?;
                let yaw = (self.rng.random::<f32>() - 0.5) * spread;
                self.apply(&TurtleOp::Yaw(1.0), Some(yaw))?;
            }
            TurtleOp::Push(kind) => {
                let frame = self.frame;
                self.stack_mut(*kind).push(&frame);
            }
            TurtleOp::Pop(kind) => match self.stack_mut(*kind).pop() {
                Some(saved) => self.frame = saved,
                None => {
                    debug!(stack = %kind, "pop on empty stack");
                    return Err(TurtleError::StackUnderflow { stack: *kind });
                }
            },
            TurtleOp::ScaleVectors(default) => {
                self.frame.scale_vectors(value.unwrap_or(*default));
            }
            TurtleOp::ScaleVectorsFixed(factor) => self.frame.scale_vectors(*factor),
            TurtleOp::ScaleRadius(default) => {
                self.frame.scale_radius(value.unwrap_or(*default));
            }
            TurtleOp::Edge => {
                let start = self.step_forward();
                return Ok(Some(Primitive::Edge(Edge {
                    start,
                    end: self.frame.position,
                    radius: self.frame.radius,
                })));
            }
            TurtleOp::Quad => {
                return Ok(Some(Primitive::Quad(Quad::from_frame(&self.frame))));
            }
            TurtleOp::Object(name) => {
                let pos = self.step_forward();
                return Ok(Some(Primitive::NamedObject(NamedObject {
                    name: name.clone(),
                    pos,
                    up: self.frame.up,
                    right: self.frame.right,
                    forward: self.frame.forward,
                })));
            }
            TurtleOp::Ignore => {}
        }
        Ok(None)
    }

    /// Applies tropism, then advances by `forward`. Returns the starting position.
    fn step_forward(&mut self) -> Vec3 {
        self.frame.apply_tropism(self.tropism, self.tropism_magnitude);
        self.frame.advance()
    }
}
