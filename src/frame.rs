//! Orientation frame of the turtle and the save/restore stacks built on it.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three vectors of an [`OrientationFrame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Forward,
    Up,
    Right,
}

/// The turtle's local basis plus its position and segment radius.
///
/// `forward`, `up` and `right` start out orthonormal. Their magnitude is part of the
/// state: the scaling commands lengthen or shorten them, and a forward move advances the
/// position by the full `forward` vector. Rotations only ever happen around the frame's
/// own vectors, so they compose with the current orientation rather than a world frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientationFrame {
    /// World-space position of the turtle.
    pub position: Vec3,

    /// Heading. A forward move adds this vector to `position`.
    pub forward: Vec3,

    pub up: Vec3,

    /// `forward × up` at construction. Not re-orthogonalized afterwards.
    pub right: Vec3,

    /// Thickness recorded on emitted edges.
    pub radius: f32,
}

impl Default for OrientationFrame {
    fn default() -> Self {
        Self::new(0.2)
    }
}

impl OrientationFrame {
    /// Creates a frame at the origin heading along +X with +Z up.
    pub fn new(radius: f32) -> Self {
        let forward = Vec3::X;
        let up = Vec3::Z;
        Self {
            position: Vec3::ZERO,
            forward,
            up,
            right: forward.cross(up),
            radius,
        }
    }

    /// Returns the current value of one of the frame vectors.
    pub fn axis(&self, axis: Axis) -> Vec3 {
        match axis {
            Axis::Forward => self.forward,
            Axis::Up => self.up,
            Axis::Right => self.right,
        }
    }

    /// Rotates the two vectors other than `axis` around `axis` by `angle` radians.
    ///
    /// This is the only rotation the command set needs: pitch turns forward/up around
    /// right, yaw turns forward/right around up, roll turns up/right around forward.
    /// The axis vector itself is left as is.
    pub fn rotate(&mut self, axis: Axis, angle: f32) {
        let Some(unit) = self.axis(axis).try_normalize() else {
            return;
        };
        let rot = Quat::from_axis_angle(unit, angle);
        match axis {
            Axis::Forward => {
                self.up = rot * self.up;
                self.right = rot * self.right;
            }
            Axis::Up => {
                self.forward = rot * self.forward;
                self.right = rot * self.right;
            }
            Axis::Right => {
                self.forward = rot * self.forward;
                self.up = rot * self.up;
            }
        }
    }

    /// Multiplies all three frame vectors by `factor`.
    pub fn scale_vectors(&mut self, factor: f32) {
        self.forward *= factor;
        self.up *= factor;
        self.right *= factor;
    }

    /// Multiplies the radius by `factor`.
    pub fn scale_radius(&mut self, factor: f32) {
        self.radius *= factor;
    }

    /// Bends the heading towards `direction * magnitude`.
    ///
    /// The shortest-arc rotation taking the current heading onto
    /// `normalize(forward + direction * magnitude)` is applied to all three vectors, so
    /// their lengths and mutual angles are preserved. A zero bias or a bias that cancels
    /// the heading exactly leaves the frame untouched.
    pub fn apply_tropism(&mut self, direction: Vec3, magnitude: f32) {
        let bias = direction * magnitude;
        if bias == Vec3::ZERO {
            return;
        }
        let (Some(from), Some(to)) = (
            self.forward.try_normalize(),
            (self.forward + bias).try_normalize(),
        ) else {
            return;
        };
        let rot = Quat::from_rotation_arc(from, to);
        self.forward = rot * self.forward;
        self.up = rot * self.up;
        self.right = rot * self.right;
    }

    /// Moves the position by the full `forward` vector and returns the old position.
    pub fn advance(&mut self) -> Vec3 {
        let start = self.position;
        self.position += self.forward;
        start
    }
}

/// Which of the two independent save/restore stacks an operation addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackKind {
    /// Addressed by `[` and `]`.
    Branch,
    /// Addressed by `(` and `)`.
    Curly,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackKind::Branch => f.write_str("branch"),
            StackKind::Curly => f.write_str("curly"),
        }
    }
}

/// LIFO of frame snapshots.
///
/// Frames are `Copy`, so a push stores an independent snapshot and a pop hands it back
/// whole; later mutation of the live frame never reaches a stored entry.
#[derive(Clone, Debug)]
pub struct BranchStack {
    kind: StackKind,
    entries: Vec<OrientationFrame>,
}

impl BranchStack {
    pub fn new(kind: StackKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    pub fn kind(&self) -> StackKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, frame: &OrientationFrame) {
        self.entries.push(*frame);
    }

    /// Removes the newest snapshot, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<OrientationFrame> {
        self.entries.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn initial_frame_is_right_handed() {
        let frame = OrientationFrame::new(0.2);
        assert_eq!(frame.right, Vec3::NEG_Y);
        assert_eq!(frame.position, Vec3::ZERO);
        assert_eq!(frame.radius, 0.2);
    }

    #[test]
    fn pitch_leaves_right_untouched() {
        let mut frame = OrientationFrame::new(0.2);
        frame.rotate(Axis::Right, FRAC_PI_2);
        assert_eq!(frame.right, Vec3::NEG_Y);
        // Rotating +X by +90° around -Y lands on +Z.
        assert!(frame.forward.abs_diff_eq(Vec3::Z, 1e-6));
        assert!(frame.up.abs_diff_eq(Vec3::NEG_X, 1e-6));
    }

    #[test]
    fn rotation_keeps_scaled_magnitude() {
        let mut frame = OrientationFrame::new(0.2);
        frame.scale_vectors(2.0);
        frame.rotate(Axis::Up, 0.7);
        frame.rotate(Axis::Forward, -1.1);
        assert!((frame.forward.length() - 2.0).abs() < 1e-5);
        assert!((frame.up.length() - 2.0).abs() < 1e-5);
        assert!((frame.right.length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn tropism_bends_heading_and_keeps_basis_orthogonal() {
        let mut frame = OrientationFrame::new(0.2);
        frame.apply_tropism(Vec3::NEG_Z, 0.5);

        let expected = (Vec3::X + Vec3::NEG_Z * 0.5).normalize();
        assert!(frame.forward.abs_diff_eq(expected, 1e-6));
        assert!(frame.forward.dot(frame.up).abs() < 1e-6);
        assert!(frame.forward.dot(frame.right).abs() < 1e-6);
        assert!(frame.up.dot(frame.right).abs() < 1e-6);
    }

    #[test]
    fn zero_tropism_is_exact_noop() {
        let mut frame = OrientationFrame::new(0.2);
        frame.rotate(Axis::Right, 0.3);
        let before = frame;
        frame.apply_tropism(Vec3::Y, 0.0);
        frame.apply_tropism(Vec3::ZERO, 3.0);
        assert_eq!(frame, before);
    }

    #[test]
    fn stacks_hand_back_snapshots() {
        let mut frame = OrientationFrame::new(0.2);
        let mut stack = BranchStack::new(StackKind::Curly);
        stack.push(&frame);
        frame.advance();
        frame.scale_radius(0.5);

        assert_eq!(stack.len(), 1);
        let saved = stack.pop().unwrap();
        assert_eq!(saved, OrientationFrame::new(0.2));
        assert!(stack.pop().is_none());
        assert_eq!(stack.kind(), StackKind::Curly);
    }
}
