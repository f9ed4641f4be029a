//! # symbios-turtle
//!
//! A 3D turtle interpreter for the strings produced by L-System expansion (for example
//! by [Symbios](https://crates.io/crates/symbios)).
//!
//! The turtle reads a finished symbol string and emits a lazy stream of engine-agnostic
//! geometric [`Primitive`]s: tapered [`Edge`]s, oriented [`Quad`]s and [`NamedObject`]
//! placements. Turning those into meshes is left to the consumer.

pub mod error;
pub mod frame;
pub mod interpreter;
pub mod primitive;
pub mod turtle;

pub use error::TurtleError;
pub use frame::*;
pub use interpreter::*;
pub use primitive::*;
pub use turtle::*;
