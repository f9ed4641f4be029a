// tests/symbios_state.rs
use glam::Vec3;
use symbios::{SymbiosState, SymbolTable};
use symbios_turtle::{Primitive, StackKind, StateInterpreter, Turtle, TurtleError, TurtleOp};

fn setup() -> (StateInterpreter, SymbolTable) {
    let mut interner = SymbolTable::new();
    let mut interpreter = StateInterpreter::new();

    // Intern symbols
    interner.intern("F").unwrap(); // Edge
    interner.intern("+").unwrap(); // Pitch
    interner.intern("[").unwrap(); // Push
    interner.intern("]").unwrap(); // Pop
    interner.intern("!").unwrap(); // Expand
    interner.intern("L").unwrap(); // Leaf object

    interpreter.populate_standard_symbols(&interner);
    interpreter.set_op(
        interner.resolve_id("L").unwrap(),
        TurtleOp::Object("leaf".to_string()),
    );

    (interpreter, interner)
}

#[test]
fn test_parameters_override_defaults() {
    let (interpreter, interner) = setup();
    let f = interner.resolve_id("F").unwrap();
    let plus = interner.resolve_id("+").unwrap();
    let bang = interner.resolve_id("!").unwrap();

    // F +(90) !(2) F
    let mut state = SymbiosState::new();
    state.push(f, 0.0, &[]).unwrap();
    state.push(plus, 0.0, &[90.0]).unwrap();
    state.push(bang, 0.0, &[2.0]).unwrap();
    state.push(f, 0.0, &[]).unwrap();

    let mut turtle = Turtle::default();
    let out: Vec<Primitive> = interpreter
        .interpret(&mut turtle, &state)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(out.len(), 2, "Should have 2 edges");
    let second = out[1].as_edge().unwrap();
    assert_eq!(second.start, Vec3::X);
    // Pitched straight up, then doubled in length.
    assert!(second.end.abs_diff_eq(Vec3::new(1.0, 0.0, 2.0), 1e-5));
}

#[test]
fn test_missing_parameters_use_defaults() {
    let (interpreter, interner) = setup();
    let f = interner.resolve_id("F").unwrap();
    let plus = interner.resolve_id("+").unwrap();

    let mut state = SymbiosState::new();
    state.push(plus, 0.0, &[]).unwrap();
    state.push(f, 0.0, &[]).unwrap();

    let mut turtle = Turtle::default();
    let out: Vec<_> = interpreter.interpret(&mut turtle, &state).collect();
    let edge = out[0].as_ref().unwrap().as_edge().unwrap();
    let dir = edge.end - edge.start;
    assert!((dir.angle_between(Vec3::X) - 30f32.to_radians()).abs() < 1e-4);
}

#[test]
fn test_branch_and_object() {
    let (interpreter, interner) = setup();
    let f = interner.resolve_id("F").unwrap();
    let push = interner.resolve_id("[").unwrap();
    let pop = interner.resolve_id("]").unwrap();
    let leaf = interner.resolve_id("L").unwrap();

    // F [ F L ] F
    let mut state = SymbiosState::new();
    for sym in [f, push, f, leaf, pop, f] {
        state.push(sym, 0.0, &[]).unwrap();
    }

    let mut turtle = Turtle::default();
    let out: Vec<Primitive> = interpreter
        .interpret(&mut turtle, &state)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(out.len(), 4);
    let object = out[2].as_named_object().unwrap();
    assert_eq!(object.name, "leaf");
    assert_eq!(object.pos, Vec3::new(2.0, 0.0, 0.0));

    // The last edge starts where the branch began.
    let last = out[3].as_edge().unwrap();
    assert_eq!(last.start, Vec3::X);
    assert_eq!(turtle.frame().position, Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(turtle.stack_depth(StackKind::Branch), 0);
}

#[test]
fn test_underflow_ends_stream() {
    let (interpreter, interner) = setup();
    let f = interner.resolve_id("F").unwrap();
    let pop = interner.resolve_id("]").unwrap();

    let mut state = SymbiosState::new();
    state.push(f, 0.0, &[]).unwrap();
    state.push(pop, 0.0, &[]).unwrap();
    state.push(f, 0.0, &[]).unwrap();

    let mut turtle = Turtle::default();
    let mut iter = interpreter.interpret(&mut turtle, &state);
    assert!(matches!(iter.next(), Some(Ok(Primitive::Edge(_)))));
    assert_eq!(
        iter.next(),
        Some(Err(TurtleError::StackUnderflow {
            stack: StackKind::Branch
        }))
    );
    assert_eq!(iter.next(), None);
}

#[test]
fn test_unmapped_symbols_are_ignored() {
    let mut interner = SymbolTable::new();
    interner.intern("X").unwrap();
    interner.intern("F").unwrap();
    let interpreter = StateInterpreter::new().with_map(Vec::new());

    let mut state = SymbiosState::new();
    state.push(interner.resolve_id("X").unwrap(), 0.0, &[]).unwrap();
    state.push(interner.resolve_id("F").unwrap(), 0.0, &[]).unwrap();

    let mut turtle = Turtle::default();
    assert_eq!(interpreter.interpret(&mut turtle, &state).count(), 0);
    assert_eq!(turtle.frame().position, Vec3::ZERO);
}
