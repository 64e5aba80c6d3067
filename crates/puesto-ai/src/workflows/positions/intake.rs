//! Boundary normalization for judge payloads.
//!
//! Judges (LLM or rule-based) return loosely structured JSON: labels in either
//! language, booleans as strings, missing fields. Everything is normalized
//! here so the rule engine only ever sees complete `FunctionJudgment` values.
//! Missing data always resolves toward the conservative reading.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{
    Alignment, ComplexityLevel, DecisionScope, ErrorConsequences, FunctionId, FunctionJudgment,
    PositionId, PositionInput,
};

/// Function judgment as emitted by an external judge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFunctionJudgment {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, alias = "descripcion", alias = "texto")]
    pub description: Option<String>,
    #[serde(default, alias = "verbo")]
    pub verb: Option<String>,
    #[serde(default, alias = "scope", alias = "alcance", alias = "alcance_decisiones")]
    pub detected_scope: Option<String>,
    #[serde(
        default,
        alias = "consequences",
        alias = "consecuencias",
        alias = "consecuencias_error"
    )]
    pub detected_consequences: Option<String>,
    #[serde(default, alias = "complexity", alias = "complejidad")]
    pub detected_complexity: Option<String>,
    #[serde(default, alias = "verbo_apropiado")]
    pub verb_appropriate: Option<Value>,
    #[serde(default, alias = "verbo_prohibido")]
    pub verb_forbidden: Option<Value>,
    #[serde(default, alias = "respaldo_externo", alias = "tiene_respaldo")]
    pub has_external_backing: Option<Value>,
    #[serde(default, alias = "alineacion")]
    pub alignment: Option<String>,
}

/// Position payload with raw functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPositionPayload {
    #[serde(default, alias = "puesto_id", alias = "id")]
    pub position_id: Option<Value>,
    #[serde(default, alias = "nivel", alias = "nivel_salarial", alias = "level")]
    pub level_code: Option<String>,
    #[serde(default, alias = "funciones")]
    pub functions: Vec<RawFunctionJudgment>,
}

impl RawFunctionJudgment {
    /// `index` is the zero-based position of the function, used for generated ids.
    pub fn normalize(self, index: usize) -> FunctionJudgment {
        let id = self
            .id
            .as_ref()
            .and_then(value_as_text)
            .unwrap_or_else(|| format!("F{}", index + 1));

        FunctionJudgment {
            id: FunctionId(id),
            description: clean_text(self.description),
            verb: clean_text(self.verb),
            detected_scope: self
                .detected_scope
                .as_deref()
                .map(DecisionScope::from_label)
                .unwrap_or(DecisionScope::Unclassified),
            detected_consequences: self
                .detected_consequences
                .as_deref()
                .map(ErrorConsequences::from_label)
                .unwrap_or(ErrorConsequences::Unclassified),
            detected_complexity: self
                .detected_complexity
                .as_deref()
                .map(ComplexityLevel::from_label)
                .unwrap_or(ComplexityLevel::Unclassified),
            verb_appropriate: loose_bool(self.verb_appropriate.as_ref()).unwrap_or(false),
            verb_forbidden: forbidden_flag(self.verb_forbidden.as_ref()),
            has_external_backing: loose_bool(self.has_external_backing.as_ref())
                .unwrap_or(false),
            alignment: self
                .alignment
                .as_deref()
                .map(Alignment::from_label)
                .unwrap_or_default(),
        }
    }
}

impl RawPositionPayload {
    /// `index` is the zero-based position in a batch. An absent id is replaced
    /// by `P{index+1:04}`; an id that is present but blank stays empty so the
    /// service refuses it.
    pub fn normalize(self, index: usize) -> PositionInput {
        let position_id = match self.position_id.as_ref() {
            Some(value) => value_as_text(value).unwrap_or_default(),
            None => format!("P{:04}", index + 1),
        };

        let functions = self
            .functions
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| raw.normalize(idx))
            .collect();

        PositionInput {
            position_id: PositionId(position_id),
            level_code: clean_text(self.level_code),
            functions,
        }
    }
}

/// Accepts a JSON array of judgments or an object wrapping them under
/// `functions`/`funciones`. Anything else yields an empty list.
pub fn normalize_judge_response(payload: &Value) -> Vec<FunctionJudgment> {
    let items: &[Value] = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("functions").or_else(|| map.get("funciones")) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<RawFunctionJudgment>(item.clone())
                .unwrap_or_default()
                .normalize(index)
        })
        .collect()
}

/// Interprets booleans, numbers and yes/no strings in English or Spanish.
pub fn loose_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => parse_bool_text(text),
        _ => None,
    }
}

pub(crate) fn parse_bool_text(text: &str) -> Option<bool> {
    match super::domain::canonical_label(text).as_str() {
        "true" | "si" | "yes" | "y" | "s" | "1" | "verdadero" => Some(true),
        "false" | "no" | "n" | "0" | "falso" => Some(false),
        _ => None,
    }
}

/// Absent means not forbidden; a value that cannot be read counts as forbidden.
fn forbidden_flag(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(value) => loose_bool(Some(value)).unwrap_or(true),
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn clean_text(value: Option<String>) -> String {
    value
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}
