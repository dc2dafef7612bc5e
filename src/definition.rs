//! This module defines `MachineDefinition`, the immutable transition table a machine runs on,
//! together with the conversion from the JSON mapping form into typed [`Instruction`]s.
//!
//! A definition document looks like this:
//!
//! ```json
//! {
//!   "blank": " ",
//!   "start state": "right",
//!   "table": {
//!     "right": { "0": "R", "1": "R", " ": { "L": "carry" } },
//!     "carry": {
//!       "1": { "write": "0", "L": null },
//!       "0": { "write": "1", "L": "done" },
//!       " ": { "write": "1", "L": "done" }
//!     }
//!   }
//! }
//! ```
//!
//! Inside an instruction mapping, `L`, `R` and `write` are directives and every other key is a
//! guard on the symbol under the head. Directives keep their document order.

use crate::types::{
    Directive, Direction, Instruction, Mode, Symbol, TuringMachineError, DEFAULT_BLANK_SYMBOL,
    DONE_STATE, EMPTY_INSTRUCTION, KEY_LEFT, KEY_RIGHT, KEY_WRITE,
};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A transition table together with its blank symbol and start state.
///
/// Definitions are read-only once built and can be shared by any number of runs.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineDefinition {
    /// The display name of the machine.
    pub name: String,
    /// Execution mode of the resolver.
    pub mode: Mode,
    /// The symbol used to grow the tape, also the wildcard key of each state's table.
    pub blank: Symbol,
    /// The state the machine starts in.
    pub start_state: String,
    /// A sample input tape.
    pub input: Option<String>,
    /// State -> symbol -> instruction.
    pub table: HashMap<String, HashMap<Symbol, Instruction>>,
}

/// The document shape before instructions are parsed.
#[derive(Deserialize)]
struct RawDefinition {
    #[serde(default)]
    name: String,
    #[serde(default)]
    mode: Mode,
    #[serde(default)]
    blank: Option<Value>,
    #[serde(rename = "start state")]
    start_state: String,
    #[serde(default)]
    input: Option<String>,
    table: Map<String, Value>,
}

impl<'de> Deserialize<'de> for MachineDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawDefinition::deserialize(deserializer)?;
        MachineDefinition::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

impl MachineDefinition {
    fn from_raw(raw: RawDefinition) -> Result<Self, TuringMachineError> {
        let blank = match &raw.blank {
            Some(value) => parse_symbol(value)?,
            None => DEFAULT_BLANK_SYMBOL,
        };

        let mut table = HashMap::with_capacity(raw.table.len());
        for (state, rules) in raw.table {
            let rules = parse_rules(&state, &rules)?;
            table.insert(state, rules);
        }

        Ok(Self {
            name: raw.name,
            mode: raw.mode,
            blank,
            start_state: raw.start_state,
            input: raw.input,
            table,
        })
    }

    /// Creates a definition from an already-typed table.
    pub fn new(
        blank: Symbol,
        start_state: impl Into<String>,
        table: HashMap<String, HashMap<Symbol, Instruction>>,
    ) -> Self {
        Self {
            name: String::new(),
            mode: Mode::default(),
            blank,
            start_state: start_state.into(),
            input: None,
            table,
        }
    }

    /// Parses a definition from a JSON value in mapping form.
    pub fn from_value(value: Value) -> Result<Self, TuringMachineError> {
        let raw: RawDefinition = serde_json::from_value(value)
            .map_err(|e| TuringMachineError::DefinitionError(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Returns this definition with the given mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Finds the instruction for `state` reading `symbol`.
    ///
    /// The terminal state always resolves to the empty instruction. Otherwise an exact match on
    /// `symbol` wins, then the entry keyed by the blank symbol. What happens when neither exists,
    /// or when `state` is not in the table, depends on [`Mode`]: `Normal` resolves to the empty
    /// instruction and `Strict` returns an error.
    pub fn resolve(&self, state: &str, symbol: Symbol) -> Result<&Instruction, TuringMachineError> {
        if state == DONE_STATE {
            return Ok(&EMPTY_INSTRUCTION);
        }

        let Some(rules) = self.table.get(state) else {
            return match self.mode {
                Mode::Normal => Ok(&EMPTY_INSTRUCTION),
                Mode::Strict => Err(TuringMachineError::InvalidState(state.to_string())),
            };
        };

        match rules.get(&symbol).or_else(|| rules.get(&self.blank)) {
            Some(instruction) => Ok(instruction),
            None => match self.mode {
                Mode::Normal => Ok(&EMPTY_INSTRUCTION),
                Mode::Strict => Err(TuringMachineError::UndefinedTransition(
                    state.to_string(),
                    symbol,
                )),
            },
        }
    }

    /// Returns `true` if `state` is the terminal state or has an entry in the table.
    pub fn is_defined(&self, state: &str) -> bool {
        state == DONE_STATE || self.table.contains_key(state)
    }
}

/// Parses one state's symbol -> instruction mapping. A null state has no rules.
fn parse_rules(
    state: &str,
    value: &Value,
) -> Result<HashMap<Symbol, Instruction>, TuringMachineError> {
    let rules = match value {
        Value::Null => return Ok(HashMap::new()),
        Value::Object(rules) => rules,
        other => {
            return Err(TuringMachineError::DefinitionError(format!(
                "Rules for state '{}' must be a mapping, found {}",
                state, other
            )))
        }
    };

    let mut parsed = HashMap::with_capacity(rules.len());
    for (key, value) in rules {
        parsed.insert(parse_symbol_key(key)?, parse_instruction(value)?);
    }

    Ok(parsed)
}

/// Parses an instruction value.
///
/// A bare string is shorthand for a single-entry mapping: `"L"` and `"R"` move without a state
/// change, `"write"` writes nothing, and any other name is a state transition.
pub fn parse_instruction(value: &Value) -> Result<Instruction, TuringMachineError> {
    match value {
        Value::Null => Ok(Instruction::default()),
        Value::String(name) => Ok(match name.as_str() {
            KEY_LEFT => Instruction::Directives(vec![Directive::Move {
                direction: Direction::Left,
                target: None,
            }]),
            KEY_RIGHT => Instruction::Directives(vec![Directive::Move {
                direction: Direction::Right,
                target: None,
            }]),
            KEY_WRITE => Instruction::Directives(vec![Directive::Write(None)]),
            _ => Instruction::Goto(name.clone()),
        }),
        Value::Number(n) => Ok(Instruction::Goto(n.to_string())),
        Value::Object(entries) => entries
            .iter()
            .map(|(key, value)| parse_directive(key, value))
            .collect::<Result<Vec<_>, _>>()
            .map(Instruction::Directives),
        other => Err(TuringMachineError::InvalidInstruction(format!(
            "expected a state name or a mapping, found {}",
            other
        ))),
    }
}

fn parse_directive(key: &str, value: &Value) -> Result<Directive, TuringMachineError> {
    match key {
        KEY_LEFT => Ok(Directive::Move {
            direction: Direction::Left,
            target: parse_target(value)?,
        }),
        KEY_RIGHT => Ok(Directive::Move {
            direction: Direction::Right,
            target: parse_target(value)?,
        }),
        KEY_WRITE => Ok(Directive::Write(parse_optional_symbol(value)?)),
        _ => Ok(Directive::Guard {
            symbol: parse_symbol_key(key)?,
            instruction: Box::new(parse_instruction(value)?),
        }),
    }
}

/// A move's target state. Null and the empty string both mean "keep the current state".
fn parse_target(value: &Value) -> Result<Option<String>, TuringMachineError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(TuringMachineError::InvalidInstruction(format!(
            "move target must be a state name, found {}",
            other
        ))),
    }
}

/// A write value. Null and the empty string both mean "write nothing".
fn parse_optional_symbol(value: &Value) -> Result<Option<Symbol>, TuringMachineError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        other => parse_symbol(other).map(Some),
    }
}

fn parse_symbol(value: &Value) -> Result<Symbol, TuringMachineError> {
    match value {
        Value::String(s) => parse_symbol_key(s),
        Value::Number(n) => parse_symbol_key(&n.to_string()),
        other => Err(TuringMachineError::InvalidSymbol(other.to_string())),
    }
}

fn parse_symbol_key(key: &str) -> Result<Symbol, TuringMachineError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(TuringMachineError::InvalidSymbol(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn binary_increment() -> MachineDefinition {
        MachineDefinition::from_value(json!({
            "blank": " ",
            "start state": "right",
            "table": {
                "right": { "0": "R", "1": "R", " ": { "L": "carry" } },
                "carry": {
                    "1": { "write": "0", "L": null },
                    "0": { "write": "1", "L": "done" },
                    " ": { "write": "1", "L": "done" }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_definition() {
        let definition = binary_increment();

        assert_eq!(definition.blank, ' ');
        assert_eq!(definition.start_state, "right");
        assert_eq!(definition.mode, Mode::Normal);
        assert_eq!(definition.table.len(), 2);
        assert_eq!(
            definition.table["carry"][&'1'],
            Instruction::Directives(vec![
                Directive::Write(Some('0')),
                Directive::Move {
                    direction: Direction::Left,
                    target: None
                },
            ])
        );
    }

    #[test]
    fn test_directives_keep_document_order() {
        let instruction = parse_instruction(&json!({ "L": null, "write": "x" })).unwrap();
        assert_eq!(
            instruction,
            Instruction::Directives(vec![
                Directive::Move {
                    direction: Direction::Left,
                    target: None
                },
                Directive::Write(Some('x')),
            ])
        );
    }

    #[test]
    fn test_bare_names() {
        assert_eq!(
            parse_instruction(&json!("R")).unwrap(),
            Instruction::Directives(vec![Directive::Move {
                direction: Direction::Right,
                target: None
            }])
        );
        assert_eq!(
            parse_instruction(&json!("done")).unwrap(),
            Instruction::Goto("done".to_string())
        );
        assert!(parse_instruction(&json!(null)).unwrap().is_empty());
    }

    #[test]
    fn test_nested_guard() {
        let instruction =
            parse_instruction(&json!({ "1": { "write": "0", "L": null }, "R": "scan" })).unwrap();

        match instruction {
            Instruction::Directives(directives) => {
                assert!(matches!(
                    &directives[0],
                    Directive::Guard { symbol: '1', instruction } if !instruction.is_empty()
                ));
                assert_eq!(
                    directives[1],
                    Directive::Move {
                        direction: Direction::Right,
                        target: Some("scan".to_string())
                    }
                );
            }
            other => panic!("Expected directives, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_symbols() {
        let definition = MachineDefinition::from_value(json!({
            "blank": 0,
            "start state": "s",
            "table": { "s": { "1": { "write": 0 } } }
        }))
        .unwrap();

        assert_eq!(definition.blank, '0');
        assert_eq!(
            definition.table["s"][&'1'],
            Instruction::Directives(vec![Directive::Write(Some('0'))])
        );
    }

    #[test]
    fn test_invalid_symbols() {
        let result = MachineDefinition::from_value(json!({
            "blank": "  ",
            "start state": "s",
            "table": {}
        }));
        assert_eq!(
            result,
            Err(TuringMachineError::InvalidSymbol("  ".to_string()))
        );

        let result = parse_instruction(&json!({ "ab": "done" }));
        assert_eq!(result, Err(TuringMachineError::InvalidSymbol("ab".to_string())));

        let result = parse_instruction(&json!({ "write": "01" }));
        assert_eq!(result, Err(TuringMachineError::InvalidSymbol("01".to_string())));
    }

    #[test]
    fn test_invalid_instruction() {
        let result = parse_instruction(&json!([1, 2]));
        assert!(matches!(
            result,
            Err(TuringMachineError::InvalidInstruction(_))
        ));
    }

    #[test]
    fn test_default_blank() {
        let definition = MachineDefinition::from_value(json!({
            "start state": "s",
            "table": { "s": null }
        }))
        .unwrap();

        assert_eq!(definition.blank, DEFAULT_BLANK_SYMBOL);
        assert!(definition.table["s"].is_empty());
    }

    #[test]
    fn test_missing_start_state_key() {
        let result = MachineDefinition::from_value(json!({ "blank": " ", "table": {} }));
        assert!(matches!(result, Err(TuringMachineError::DefinitionError(_))));
    }

    #[test]
    fn test_resolve_exact_then_blank() {
        let definition = binary_increment();

        assert_eq!(
            definition.resolve("right", '1').unwrap(),
            &definition.table["right"][&'1']
        );
        // 'x' has no entry, the blank entry is the wildcard.
        assert_eq!(
            definition.resolve("right", 'x').unwrap(),
            &definition.table["right"][&' ']
        );
    }

    #[test]
    fn test_resolve_done_is_empty() {
        let definition = binary_increment();
        assert!(definition.resolve(DONE_STATE, '1').unwrap().is_empty());
    }

    #[test]
    fn test_resolve_miss_normal_and_strict() {
        let mut table = HashMap::new();
        table.insert(
            "s".to_string(),
            HashMap::from([('a', Instruction::Goto("done".to_string()))]),
        );
        let definition = MachineDefinition::new('_', "s", table);

        assert!(definition.resolve("s", 'b').unwrap().is_empty());
        assert!(definition.resolve("missing", 'a').unwrap().is_empty());

        let strict = definition.with_mode(Mode::Strict);
        assert_eq!(
            strict.resolve("s", 'b'),
            Err(TuringMachineError::UndefinedTransition("s".to_string(), 'b'))
        );
        assert_eq!(
            strict.resolve("missing", 'a'),
            Err(TuringMachineError::InvalidState("missing".to_string()))
        );
    }
}
