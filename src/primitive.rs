use crate::frame::OrientationFrame;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One unit of geometry produced by the turtle.
///
/// Every field is copied out of the turtle when the record is created, so a primitive
/// never changes after it has been yielded, whatever the turtle does next.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// A tapered segment drawn by a forward move (`F`).
    Edge(Edge),
    /// An oriented quad at the turtle's position (`Q`).
    Quad(Quad),
    /// A named placement marker from the inline `{name}` syntax.
    NamedObject(NamedObject),
}

/// Segment from the position before a move to the position after it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: Vec3,
    pub end: Vec3,
    /// Turtle radius at the time of the move.
    pub radius: f32,
}

/// A quad anchored at `pos` and spanned by the frame vectors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub pos: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub forward: Vec3,
}

impl Quad {
    pub(crate) fn from_frame(frame: &OrientationFrame) -> Self {
        Self {
            pos: frame.position,
            up: frame.up,
            right: frame.right,
            forward: frame.forward,
        }
    }
}

/// An externally defined object to be placed at `pos` with the given orientation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedObject {
    /// The text between `{` and `}`.
    pub name: String,
    /// Position at the start of the move that placed the object.
    pub pos: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub forward: Vec3,
}

impl Primitive {
    /// Returns the edge payload, if this is an edge.
    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Primitive::Edge(edge) => Some(edge),
            _ => None,
        }
    }

    pub fn as_quad(&self) -> Option<&Quad> {
        match self {
            Primitive::Quad(quad) => Some(quad),
            _ => None,
        }
    }

    pub fn as_named_object(&self) -> Option<&NamedObject> {
        match self {
            Primitive::NamedObject(object) => Some(object),
            _ => None,
        }
    }
}

impl From<Edge> for Primitive {
    fn from(edge: Edge) -> Self {
        Primitive::Edge(edge)
    }
}

impl From<Quad> for Primitive {
    fn from(quad: Quad) -> Self {
        Primitive::Quad(quad)
    }
}

impl From<NamedObject> for Primitive {
    fn from(object: NamedObject) -> Self {
        Primitive::NamedObject(object)
    }
}
