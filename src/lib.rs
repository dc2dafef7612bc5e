//! This crate provides a single-tape Turing Machine execution engine.
//! It includes modules for loading and analyzing machine definitions, the tape, the machine
//! itself with its step-by-step history, and a catalog of embedded example machines.

pub mod analyzer;
pub mod definition;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, unreachable_states, AnalysisError};
/// Re-exports the `MachineDefinition` struct from the definition module.
pub use definition::MachineDefinition;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the instruction, history and error types from the types module.
pub use types::{
    Direction, Directive, HistoryEntry, Instruction, Mode, RunOutcome, Step, Symbol,
    TuringMachineError, DEFAULT_BLANK_SYMBOL, DONE_STATE, MAX_DEFINITION_SIZE,
};

/// Runs `definition` on `input` and returns the trimmed tape, the history and whether the
/// machine reached the terminal state.
///
/// `max_steps` of `None` or `Some(0)` runs without a limit.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tmachine::{run, MachineDefinition};
///
/// let definition = MachineDefinition::from_value(json!({
///     "blank": " ",
///     "start state": "start",
///     "table": { "start": { "0": { "R": "start" }, " ": "done" } }
/// }))
/// .unwrap();
///
/// let outcome = run(&definition, "000", None).unwrap();
/// assert_eq!(outcome.tape, "000");
/// assert_eq!(outcome.history.len(), 4);
/// assert!(outcome.halted);
/// ```
pub fn run(
    definition: &MachineDefinition,
    input: &str,
    max_steps: Option<usize>,
) -> Result<RunOutcome, TuringMachineError> {
    let mut machine = TuringMachine::new(definition, input);
    machine.run(max_steps)?;
    Ok(machine.finish())
}
