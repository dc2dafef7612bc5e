//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! definitions from JSON files and strings.

use crate::definition::MachineDefinition;
use crate::types::{TuringMachineError, MAX_DEFINITION_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// `ProgramLoader` is a utility struct for loading machine definitions.
/// It provides methods to load definitions from individual files, from string content,
/// and to discover and load all `.json` files within a specified directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single machine definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineDefinition)` if the file is successfully read and parsed.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::DefinitionError)` if the content is not a valid definition.
    pub fn load_program(path: &Path) -> Result<MachineDefinition, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_program_from_string(&content)
    }

    /// Loads a single machine definition from the provided string content.
    ///
    /// Documents larger than [`MAX_DEFINITION_SIZE`] are rejected.
    pub fn load_program_from_string(content: &str) -> Result<MachineDefinition, TuringMachineError> {
        if content.len() > MAX_DEFINITION_SIZE {
            return Err(TuringMachineError::DefinitionError(format!(
                "Definition is {} bytes, the limit is {}",
                content.len(),
                MAX_DEFINITION_SIZE
            )));
        }

        serde_json::from_str(content).map_err(|e| TuringMachineError::DefinitionError(e.to_string()))
    }

    /// Loads all machine definitions (`.json` extension) from a given directory.
    ///
    /// Directories and non-`.json` files are skipped.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, MachineDefinition), TuringMachineError>>` - one element per
    ///   candidate file, holding either its path and definition or the load error.
    pub fn load_programs(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, MachineDefinition), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(definition) => Some(Ok((path, definition))),
                    Err(e) => {
                        log::warn!("skipping {}: {}", path.display(), e);
                        Some(Err(TuringMachineError::FileError(format!(
                            "Failed to load program from {}: {}",
                            path.display(),
                            e
                        ))))
                    }
                }
            })
            .collect()
    }
}
