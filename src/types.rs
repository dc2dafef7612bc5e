//! This module defines the core data structures and types used throughout the Turing Machine
//! engine, including instructions, execution records, run outcomes, and error types.

use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use thiserror::Error;

/// The terminal state. Reaching it halts the run; it never appears as a table key.
pub const DONE_STATE: &str = "done";
/// The default blank symbol used on the Turing Machine tape.
pub const DEFAULT_BLANK_SYMBOL: char = ' ';
/// The maximum allowed size for a machine definition document in bytes.
pub const MAX_DEFINITION_SIZE: usize = 65536; // 64KB

/// Directive key for a left move.
pub const KEY_LEFT: &str = "L";
/// Directive key for a right move.
pub const KEY_RIGHT: &str = "R";
/// Directive key for a write.
pub const KEY_WRITE: &str = "write";

/// A single tape cell value.
pub type Symbol = char;

/// How the resolver treats transitions missing from the table.
///
/// - `Normal` (default): a lookup miss is a no-op step and the state is left unchanged.
///   A state missing from the table is treated the same way.
/// - `Strict`: the definition is analyzed before running and any lookup miss is an error.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum Mode {
    /// Lookup misses are silent no-ops.
    #[default]
    Normal,
    /// Lookup misses and undefined states are errors.
    Strict,
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// The directive key this direction is written as.
    pub fn key(self) -> &'static str {
        match self {
            Direction::Left => KEY_LEFT,
            Direction::Right => KEY_RIGHT,
        }
    }
}

/// What the machine does on one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Transition to the named state without moving or writing.
    Goto(String),
    /// Directives applied in order. An empty list is a no-op.
    Directives(Vec<Directive>),
}

/// One entry of an [`Instruction::Directives`] list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Move the head, optionally switching to `target`.
    Move {
        direction: Direction,
        target: Option<String>,
    },
    /// Overwrite the symbol under the head. `None` leaves the cell untouched.
    Write(Option<Symbol>),
    /// Apply `instruction` only if the symbol under the head equals `symbol`.
    Guard {
        symbol: Symbol,
        instruction: Box<Instruction>,
    },
}

/// The instruction returned for terminal states and lookup misses.
pub static EMPTY_INSTRUCTION: Instruction = Instruction::Directives(Vec::new());

impl Instruction {
    /// Returns `true` if applying this instruction has no effect.
    pub fn is_empty(&self) -> bool {
        matches!(self, Instruction::Directives(directives) if directives.is_empty())
    }

    /// Every state this instruction (including nested guards) may transition to.
    pub fn targets(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_targets(&mut out);
        out
    }

    fn collect_targets<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Instruction::Goto(state) => out.push(state),
            Instruction::Directives(directives) => {
                for directive in directives {
                    match directive {
                        Directive::Move {
                            target: Some(state),
                            ..
                        } => out.push(state),
                        Directive::Guard { instruction, .. } => instruction.collect_targets(out),
                        _ => {}
                    }
                }
            }
        }
    }
}

impl Default for Instruction {
    fn default() -> Self {
        EMPTY_INSTRUCTION.clone()
    }
}

/// Instructions serialize back into the mapping form they are loaded from.
impl Serialize for Instruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Instruction::Goto(state) => serializer.serialize_str(state),
            Instruction::Directives(directives) => {
                let mut map = serializer.serialize_map(Some(directives.len()))?;
                for directive in directives {
                    match directive {
                        Directive::Move { direction, target } => {
                            map.serialize_entry(direction.key(), target)?
                        }
                        Directive::Write(value) => {
                            map.serialize_entry(KEY_WRITE, &value.map(String::from))?
                        }
                        Directive::Guard {
                            symbol,
                            instruction,
                        } => map.serialize_entry(&symbol.to_string(), instruction)?,
                    }
                }
                map.end()
            }
        }
    }
}

/// Snapshot of the machine taken before a step's effects are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// The state the step started in.
    pub state: String,
    /// The symbol under the head.
    pub reading: Symbol,
    /// The head position.
    pub position: usize,
    /// The whole tape, concatenated.
    pub memory: String,
    /// The instruction about to be applied.
    pub transition: Instruction,
}

/// Represents the outcome of a single `step` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine performed a step and may continue.
    Continue,
    /// The machine is in the terminal state; nothing was executed.
    Halt,
}

/// The three-part result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    /// The trimmed final tape.
    pub tape: String,
    /// One entry per executed step, in execution order.
    pub history: Vec<HistoryEntry>,
    /// `true` only if the machine reached the terminal state.
    pub halted: bool,
}

/// Represents various errors that can occur during Turing Machine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// Indicates that resolution reached a state absent from the table.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// Indicates that there's no rule defined for a state and symbol.
    #[error("No rule defined for state {0} and symbol {1:?}")]
    UndefinedTransition(String, Symbol),
    /// Indicates a value that should be exactly one symbol but is not.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
    /// Indicates an instruction of an unsupported shape.
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),
    /// Indicates a malformed machine definition document.
    #[error("Definition error: {0}")]
    DefinitionError(String),
    /// Indicates an error during the validation of a machine definition.
    #[error("Definition validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(left_json, "\"Left\"");

        let right: Direction = serde_json::from_str("\"Right\"").unwrap();
        assert_eq!(right, Direction::Right);
    }

    #[test]
    fn test_instruction_serializes_to_mapping_form() {
        let instruction = Instruction::Directives(vec![
            Directive::Write(Some('0')),
            Directive::Move {
                direction: Direction::Left,
                target: None,
            },
            Directive::Guard {
                symbol: '1',
                instruction: Box::new(Instruction::Goto("done".to_string())),
            },
        ]);

        let json = serde_json::to_string(&instruction).unwrap();
        assert_eq!(json, r#"{"write":"0","L":null,"1":"done"}"#);
        assert_eq!(serde_json::to_string(&EMPTY_INSTRUCTION).unwrap(), "{}");
    }

    #[test]
    fn test_instruction_targets_include_nested_guards() {
        let instruction = Instruction::Directives(vec![
            Directive::Move {
                direction: Direction::Right,
                target: Some("scan".to_string()),
            },
            Directive::Guard {
                symbol: 'x',
                instruction: Box::new(Instruction::Goto("erase".to_string())),
            },
        ]);

        assert_eq!(instruction.targets(), vec!["scan", "erase"]);
        assert!(!instruction.is_empty());
        assert!(Instruction::default().is_empty());
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::UndefinedTransition("q0".to_string(), 'x');

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("No rule defined"));
        assert!(error_msg.contains("q0"));
        assert!(error_msg.contains("'x'"));
    }
}
