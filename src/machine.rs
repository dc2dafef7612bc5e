//! This module defines the `TuringMachine` struct, which runs a single-tape machine over a
//! borrowed `MachineDefinition`. It resolves and applies instructions, records a snapshot
//! before every step, and trims the tape once the run is over.

use crate::analyzer::analyze;
use crate::definition::MachineDefinition;
use crate::tape::Tape;
use crate::types::{
    Directive, HistoryEntry, Instruction, Mode, RunOutcome, Step, Symbol, TuringMachineError,
    DONE_STATE,
};

/// A single-tape Turing Machine.
///
/// The machine owns its state, tape and history; the definition is only borrowed, so one
/// definition can drive any number of machines independently.
#[derive(Debug, Clone)]
pub struct TuringMachine<'a> {
    definition: &'a MachineDefinition,
    input: String,
    state: String,
    tape: Tape,
    history: Vec<HistoryEntry>,
    step_count: usize,
}

impl<'a> TuringMachine<'a> {
    /// Creates a machine in the definition's start state with `input` on the tape.
    ///
    /// # Arguments
    ///
    /// * `definition` - The transition table to run.
    /// * `input` - The initial tape; each character becomes one cell.
    pub fn new(definition: &'a MachineDefinition, input: &str) -> Self {
        Self {
            definition,
            input: input.to_string(),
            state: definition.start_state.clone(),
            tape: Tape::new(input, definition.blank),
            history: Vec::new(),
            step_count: 0,
        }
    }

    /// Executes a single step: resolve, record, apply.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if an instruction was applied (possibly the empty one).
    /// * `Ok(Step::Halt)` if the machine is already in the terminal state.
    /// * `Err(TuringMachineError)` if the definition is strict and has no rule for the
    ///   current state and symbol.
    pub fn step(&mut self) -> Result<Step, TuringMachineError> {
        if self.is_halted() {
            return Ok(Step::Halt);
        }

        let definition = self.definition;
        let instruction = definition.resolve(&self.state, self.tape.read())?;

        self.record(instruction);
        log::trace!(
            "step {}: state={} reading={:?} position={}",
            self.step_count,
            self.state,
            self.tape.read(),
            self.tape.position()
        );

        self.apply(instruction);
        self.step_count += 1;

        Ok(Step::Continue)
    }

    /// Runs until the terminal state is reached or `max_steps` steps have been executed.
    ///
    /// `None` and `Some(0)` both mean no limit, in which case a machine that never reaches
    /// the terminal state runs forever.
    pub fn run(&mut self, max_steps: Option<usize>) -> Result<(), TuringMachineError> {
        self.run_with_observer(max_steps, |_| {})
    }

    /// Like [`TuringMachine::run`], calling `observer` after every executed step.
    pub fn run_with_observer<F>(
        &mut self,
        max_steps: Option<usize>,
        mut observer: F,
    ) -> Result<(), TuringMachineError>
    where
        F: FnMut(&TuringMachine<'a>),
    {
        if self.definition.mode == Mode::Strict {
            analyze(self.definition)?;
        }

        let limit = max_steps.filter(|&n| n > 0);
        log::debug!(
            "running '{}' from state {} (limit: {:?})",
            self.definition.name,
            self.state,
            limit
        );

        let mut executed = 0;
        while !self.is_halted() {
            if limit.is_some_and(|n| executed >= n) {
                log::debug!("step budget of {} exhausted in state {}", executed, self.state);
                break;
            }

            self.step()?;
            executed += 1;
            observer(self);
        }

        log::debug!(
            "stopped after {} steps in state {} (halted: {})",
            self.step_count,
            self.state,
            self.is_halted()
        );

        Ok(())
    }

    /// Applies `instruction` to the machine.
    ///
    /// Directives are applied in order and the tape is filled after each one, so a guard
    /// that follows a move reads the cell the head moved onto. Guards recurse into their
    /// sub-instruction only when the symbol under the head matches.
    pub fn apply(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Goto(state) => {
                self.state.clone_from(state);
                self.tape.fill();
            }
            Instruction::Directives(directives) => {
                for directive in directives {
                    match directive {
                        Directive::Move { direction, target } => {
                            self.tape.shift(*direction);
                            if let Some(target) = target {
                                self.state.clone_from(target);
                            }
                        }
                        Directive::Write(value) => {
                            if let Some(symbol) = value {
                                self.tape.write(*symbol);
                            }
                        }
                        Directive::Guard {
                            symbol,
                            instruction,
                        } => {
                            if self.tape.read() == *symbol {
                                self.apply(instruction);
                            }
                        }
                    }

                    self.tape.fill();
                }
            }
        }
    }

    fn record(&mut self, transition: &Instruction) {
        self.history.push(HistoryEntry {
            state: self.state.clone(),
            reading: self.tape.read(),
            position: self.tape.position(),
            memory: self.tape.to_string(),
            transition: transition.clone(),
        });
    }

    /// Trims the tape and returns the final tape, the history and the halted flag.
    pub fn finish(mut self) -> RunOutcome {
        self.tape.trim();

        RunOutcome {
            halted: self.is_halted(),
            tape: self.tape.to_string(),
            history: self.history,
        }
    }

    /// Resets the machine to its start state and initial tape, clearing the history.
    pub fn reset(&mut self) {
        self.state = self.definition.start_state.clone();
        self.tape = Tape::new(&self.input, self.definition.blank);
        self.history.clear();
        self.step_count = 0;
    }

    /// Returns `true` if the machine is in the terminal state.
    pub fn is_halted(&self) -> bool {
        self.state == DONE_STATE
    }

    /// Returns the current state of the Turing Machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> Symbol {
        self.tape.read()
    }

    /// Returns the head position.
    pub fn position(&self) -> usize {
        self.tape.position()
    }

    /// Returns the snapshots recorded so far.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the definition this machine runs on.
    pub fn definition(&self) -> &'a MachineDefinition {
        self.definition
    }
}
