use super::super::domain::{LevelLetter, PositionId};
use super::super::evaluation::{Classification, Criterion};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CriterionPassEntry {
    pub criterion: Criterion,
    pub criterion_label: &'static str,
    pub passed: usize,
    pub total: usize,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelBreakdownEntry {
    pub letter: LevelLetter,
    pub letter_label: &'static str,
    pub approved: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionLineView {
    pub position_id: PositionId,
    pub level_code: String,
    pub classification: Classification,
    pub criteria_passed: u8,
    pub confidence_global: f64,
    pub accion_requerida: String,
    pub total_functions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReportSummary {
    pub total_positions: usize,
    pub approved: usize,
    pub rejected: usize,
    pub approval_rate: f64,
    pub average_confidence: f64,
    pub criteria: Vec<CriterionPassEntry>,
    pub levels: Vec<LevelBreakdownEntry>,
    pub positions: Vec<PositionLineView>,
}
