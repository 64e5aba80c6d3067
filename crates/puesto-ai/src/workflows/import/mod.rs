//! CSV intake for already-judged functions, one row per function.
//!
//! Rows are grouped by position id in first-appearance order and pass through
//! the same label normalization as judge payloads.

mod normalizer;
mod parser;

use crate::workflows::positions::domain::{PositionId, PositionInput};
use crate::workflows::positions::intake::RawFunctionJudgment;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use parser::FunctionRow;

#[derive(Debug)]
pub enum PositionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingPositionId { line: u64 },
    ConflictingLevel {
        position_id: String,
        first: String,
        second: String,
    },
}

impl std::fmt::Display for PositionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionImportError::Io(err) => write!(f, "failed to read position export: {}", err),
            PositionImportError::Csv(err) => write!(f, "invalid position CSV data: {}", err),
            PositionImportError::MissingPositionId { line } => {
                write!(f, "line {} has no position_id", line)
            }
            PositionImportError::ConflictingLevel {
                position_id,
                first,
                second,
            } => write!(
                f,
                "position {} declares conflicting level codes '{}' and '{}'",
                position_id, first, second
            ),
        }
    }
}

impl std::error::Error for PositionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PositionImportError::Io(err) => Some(err),
            PositionImportError::Csv(err) => Some(err),
            PositionImportError::MissingPositionId { .. }
            | PositionImportError::ConflictingLevel { .. } => None,
        }
    }
}

impl From<std::io::Error> for PositionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for PositionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct PositionCsvImporter;

impl PositionCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PositionInput>, PositionImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<PositionInput>, PositionImportError> {
        let mut positions: Vec<PositionInput> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for row in parser::parse_rows(reader)? {
            if row.position_id.is_empty() {
                return Err(PositionImportError::MissingPositionId { line: row.line });
            }

            let slot = match slots.get(&row.position_id) {
                Some(slot) => *slot,
                None => {
                    positions.push(PositionInput {
                        position_id: PositionId(row.position_id.clone()),
                        level_code: String::new(),
                        functions: Vec::new(),
                    });
                    slots.insert(row.position_id.clone(), positions.len() - 1);
                    positions.len() - 1
                }
            };

            apply_row(row, &mut positions[slot])?;
        }

        Ok(positions)
    }
}

fn apply_row(row: FunctionRow, position: &mut PositionInput) -> Result<(), PositionImportError> {
    if !row.level_code.is_empty() {
        if position.level_code.is_empty() {
            position.level_code = row.level_code.clone();
        } else if !position.level_code.eq_ignore_ascii_case(&row.level_code) {
            return Err(PositionImportError::ConflictingLevel {
                position_id: position.position_id.0.clone(),
                first: position.level_code.clone(),
                second: row.level_code,
            });
        }
    }

    let index = position.functions.len();
    let raw = RawFunctionJudgment {
        id: row.function_id.map(Value::String),
        description: Some(row.description),
        verb: Some(row.verb),
        detected_scope: row.scope,
        detected_consequences: row.consequences,
        detected_complexity: row.complexity,
        verb_appropriate: row.verb_appropriate.map(Value::String),
        verb_forbidden: row.verb_forbidden.map(Value::String),
        has_external_backing: row.has_external_backing.map(Value::String),
        alignment: row.alignment,
    };
    position.functions.push(raw.normalize(index));

    Ok(())
}
