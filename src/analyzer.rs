//! This module provides functions for analyzing machine definitions to detect common errors
//! before execution: an undefined start state, transitions into undefined states, and states
//! that can never be reached.

use crate::definition::MachineDefinition;
use crate::types::{TuringMachineError, DONE_STATE};
use std::collections::HashSet;

/// Represents various errors that can be found during the analysis of a machine definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates that the start state has no entry in the table.
    InvalidStartState(String),
    /// Indicates that instructions reference states that are not defined in the table.
    UndefinedNextStates(Vec<String>),
    /// Indicates states that are defined but cannot be reached from the start state.
    UnreachableStates(Vec<String>),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidStartState(state) => {
                TuringMachineError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::UndefinedNextStates(transitions) => TuringMachineError::ValidationError(
                format!("Transitions reference undefined states: {:?}", transitions),
            ),
            AnalysisError::UnreachableStates(states) => TuringMachineError::ValidationError(
                format!("Unreachable states detected: {:?}", states),
            ),
        }
    }
}

/// Analyzes a `MachineDefinition` for errors that would make a run fail.
///
/// Unreachable states are not an error; they are logged as a warning.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::ValidationError)` for the first check that fails.
pub fn analyze(definition: &MachineDefinition) -> Result<(), TuringMachineError> {
    let errors = [check_valid_start_state, check_undefined_next_states]
        .iter()
        .filter_map(|f| f(definition).err())
        .collect::<Vec<_>>();

    if let Some(first_error) = errors.into_iter().next() {
        return Err(first_error.into());
    }

    if let Err(AnalysisError::UnreachableStates(states)) = check_unreachable_states(definition) {
        log::warn!(
            "'{}' has states unreachable from {}: {:?}",
            definition.name,
            definition.start_state,
            states
        );
    }

    Ok(())
}

/// Returns the states that cannot be reached from the start state, sorted.
pub fn unreachable_states(definition: &MachineDefinition) -> Vec<String> {
    match check_unreachable_states(definition) {
        Err(AnalysisError::UnreachableStates(states)) => states,
        _ => Vec::new(),
    }
}

/// Checks whether the start state is the terminal state or has an entry in the table.
fn check_valid_start_state(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    if !definition.is_defined(&definition.start_state) {
        return Err(AnalysisError::InvalidStartState(
            definition.start_state.clone(),
        ));
    }

    Ok(())
}

/// Checks that every state an instruction can switch to, including inside guards, is defined.
///
/// The terminal state is implicitly defined.
fn check_undefined_next_states(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    let mut undefined = Vec::new();
    for (state, rules) in &definition.table {
        for (symbol, instruction) in rules {
            for target in instruction.targets() {
                if !definition.is_defined(target) {
                    undefined.push(format!("{}[{:?}] -> {}", state, symbol, target));
                }
            }
        }
    }

    if !undefined.is_empty() {
        undefined.sort();
        return Err(AnalysisError::UndefinedNextStates(undefined));
    }

    Ok(())
}

/// Checks for unreachable states by traversing from the start state.
fn check_unreachable_states(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![definition.start_state.as_str()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        if let Some(rules) = definition.table.get(state) {
            for instruction in rules.values() {
                queue.extend(
                    instruction
                        .targets()
                        .into_iter()
                        .filter(|target| !visited.contains(target)),
                );
            }
        }
    }

    let mut unreachable: Vec<String> = definition
        .table
        .keys()
        .filter(|state| state.as_str() != DONE_STATE && !visited.contains(state.as_str()))
        .cloned()
        .collect();

    if !unreachable.is_empty() {
        unreachable.sort(); // Sort for deterministic output
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}
