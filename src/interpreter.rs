//! Drivers that feed symbols to a [`Turtle`] and stream out the resulting primitives.
//!
//! Two inputs are supported:
//!
//! * a finished symbol string, scanned one `char` at a time by [`Turtle::interpret`];
//! * a [`symbios::SymbiosState`], walked module by module by [`StateInterpreter`]. The
//!   first parameter of each module is passed to the command as its explicit value.
//!
//! Both produce a lazy iterator of `Result<Primitive, TurtleError>`. A stack underflow is
//! yielded once as an `Err` and ends the iteration.

use crate::error::{Result, TurtleError};
use crate::primitive::Primitive;
use crate::turtle::{Turtle, TurtleOp, command_for};
use std::iter::FusedIterator;
use symbios::{SymbiosState, SymbolTable};
use tracing::{debug, warn};

/// The single-character symbols that have a standard meaning.
pub const STANDARD_SYMBOLS: &str = "+-/\\<>&[]()!@^*#%=|FQ";

impl Turtle {
    /// Interprets a symbol string, yielding primitives as they are produced.
    ///
    /// Characters are dispatched through [`command_for`]; unknown characters are
    /// skipped. A run starting at `{` collects characters up to the first `}` and then
    /// places a named object, moving forward like `F`. Braces do not nest and cannot be
    /// escaped.
    ///
    /// Work happens only as the iterator is pulled. The turtle keeps its state when the
    /// iterator is dropped, so a second call continues from where the first one stopped.
    ///
    /// # Example
    ///
    /// ```
    /// use symbios_turtle::{Primitive, Turtle};
    ///
    /// let mut turtle = Turtle::default();
    /// let edges = turtle
    ///     .interpret("F[+F]F".chars())
    ///     .filter_map(|p| p.ok())
    ///     .filter(|p| matches!(p, Primitive::Edge(_)))
    ///     .count();
    /// assert_eq!(edges, 3);
    /// ```
    pub fn interpret<I>(&mut self, input: I) -> Interpretation<'_, I::IntoIter>
    where
        I: IntoIterator<Item = char>,
    {
        debug!("interpreting symbol string");
        Interpretation {
            turtle: self,
            input: input.into_iter(),
            name: String::new(),
            finished: false,
        }
    }
}

/// Lazy primitive stream over a symbol string. Created by [`Turtle::interpret`].
#[derive(Debug)]
pub struct Interpretation<'t, I> {
    turtle: &'t mut Turtle,
    input: I,
    /// Pending `{name` run, including the opening brace.
    name: String,
    finished: bool,
}

impl<I> Interpretation<'_, I> {
    fn fail(&mut self, err: TurtleError) -> Option<Result<Primitive>> {
        self.finished = true;
        Some(Err(err))
    }

    /// Handles a name run still open at end of input.
    fn finish(&mut self) -> Option<Result<Primitive>> {
        self.finished = true;
        if self.name.is_empty() {
            return None;
        }
        let mut name = std::mem::take(&mut self.name);
        name.remove(0);
        if self.turtle.strict_names() {
            return self.fail(TurtleError::MalformedName { name });
        }
        warn!(%name, "dropping unterminated object name");
        None
    }
}

impl<I> Iterator for Interpretation<'_, I>
where
    I: Iterator<Item = char>,
{
    type Item = Result<Primitive>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let Some(c) = self.input.next() else {
                return self.finish();
            };

            let op = if c == '}' && !self.name.is_empty() {
                let mut name = std::mem::take(&mut self.name);
                name.remove(0);
                TurtleOp::Object(name)
            } else if c == '{' || !self.name.is_empty() {
                self.name.push(c);
                continue;
            } else if let Some(op) = command_for(c) {
                op
            } else {
                continue;
            };

            match self.turtle.apply(&op, None) {
                Ok(Some(primitive)) => return Some(Ok(primitive)),
                Ok(None) => {}
                Err(err) => return self.fail(err),
            }
        }
    }
}

impl<I> FusedIterator for Interpretation<'_, I> where I: Iterator<Item = char> {}

/// Maps symbios symbol IDs to turtle operations.
///
/// Unlike the string scanner, this path passes module parameters through: the first
/// parameter of a module overrides the angle or factor of its command.
#[derive(Clone, Debug, Default)]
pub struct StateInterpreter {
    op_map: Vec<TurtleOp>,
}

impl StateInterpreter {
    /// Creates an interpreter with an empty symbol map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    ///
    /// `map` is indexed by symbol ID as returned by [`symbios::SymbolTable`].
    /// Any ID that falls outside the slice is treated as [`TurtleOp::Ignore`].
    pub fn with_map(mut self, map: Vec<TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol ID, growing the map as needed.
    pub fn set_op(&mut self, sym_id: u16, op: TurtleOp) {
        let idx = sym_id as usize;
        if idx >= self.op_map.len() {
            self.op_map.resize(idx + 1, TurtleOp::Ignore);
        }
        self.op_map[idx] = op;
    }

    /// Registers every entry of [`STANDARD_SYMBOLS`] found in `interner`.
    ///
    /// Symbols the interner does not know are skipped.
    pub fn populate_standard_symbols(&mut self, interner: &SymbolTable) {
        for symbol in STANDARD_SYMBOLS.chars() {
            if let Some(op) = command_for(symbol)
                && let Some(id) = interner.resolve_id(&symbol.to_string())
            {
                self.set_op(id, op);
            }
        }
    }

    /// Walks `state` in order and yields the primitives produced by `turtle`.
    pub fn interpret<'a>(
        &'a self,
        turtle: &'a mut Turtle,
        state: &'a SymbiosState,
    ) -> StateInterpretation<'a> {
        debug!(modules = state.len(), "interpreting symbios state");
        StateInterpretation {
            interpreter: self,
            turtle,
            state,
            index: 0,
            finished: false,
        }
    }
}

/// Lazy primitive stream over a [`SymbiosState`]. Created by [`StateInterpreter::interpret`].
pub struct StateInterpretation<'a> {
    interpreter: &'a StateInterpreter,
    turtle: &'a mut Turtle,
    state: &'a SymbiosState,
    index: usize,
    finished: bool,
}

impl Iterator for StateInterpretation<'_> {
    type Item = Result<Primitive>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished && self.index < self.state.len() {
            let Some(view) = self.state.get_view(self.index) else {
                break;
            };
            self.index += 1;

            let op = self
                .interpreter
                .op_map
                .get(view.sym as usize)
                .unwrap_or(&TurtleOp::Ignore);
            let value = view.params.first().map(|&x| x as f32);

            match self.turtle.apply(op, value) {
                Ok(Some(primitive)) => return Some(Ok(primitive)),
                Ok(None) => {}
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
        self.finished = true;
        None
    }
}

impl FusedIterator for StateInterpretation<'_> {}
