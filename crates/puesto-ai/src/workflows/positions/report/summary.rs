use super::super::domain::LevelLetter;
use super::super::evaluation::{Classification, Criterion, ValidationOutcome};
use super::views::{BatchReportSummary, CriterionPassEntry, LevelBreakdownEntry, PositionLineView};
use std::collections::HashMap;
use std::fmt::Write as _;

#[derive(Debug, Default, Clone)]
pub struct LevelTally {
    pub approved: usize,
    pub rejected: usize,
}

/// Aggregate view over a batch of validation outcomes.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ValidationOutcome>,
    pub criterion_passes: HashMap<Criterion, usize>,
    pub level_tally: HashMap<LevelLetter, LevelTally>,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: Vec<ValidationOutcome>) -> Self {
        let mut criterion_passes = HashMap::new();
        let mut level_tally: HashMap<LevelLetter, LevelTally> = HashMap::new();

        for outcome in &outcomes {
            for result in outcome.criteria.iter().filter(|result| result.passed()) {
                *criterion_passes.entry(result.name).or_insert(0) += 1;
            }

            let tally = level_tally.entry(outcome.level.letter).or_default();
            match outcome.classification() {
                Classification::Aprobado => tally.approved += 1,
                Classification::Rechazado => tally.rejected += 1,
            }
        }

        Self {
            outcomes,
            criterion_passes,
            level_tally,
        }
    }

    pub fn approved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.classification().is_approved())
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes.len() - self.approved()
    }

    pub fn summary(&self) -> BatchReportSummary {
        let total_positions = self.outcomes.len();
        let approved = self.approved();

        let criteria = Criterion::ordered()
            .into_iter()
            .map(|criterion| {
                let passed = self.criterion_passes.get(&criterion).copied().unwrap_or(0);
                CriterionPassEntry {
                    criterion,
                    criterion_label: criterion.label(),
                    passed,
                    total: total_positions,
                    pass_rate: ratio(passed, total_positions),
                }
            })
            .collect();

        let levels = LevelLetter::ordered()
            .into_iter()
            .filter_map(|letter| {
                self.level_tally.get(&letter).map(|tally| LevelBreakdownEntry {
                    letter,
                    letter_label: letter.label(),
                    approved: tally.approved,
                    rejected: tally.rejected,
                })
            })
            .collect();

        let positions = self
            .outcomes
            .iter()
            .map(|outcome| PositionLineView {
                position_id: outcome.position_id.clone(),
                level_code: outcome.level.level_code.clone(),
                classification: outcome.classification(),
                criteria_passed: outcome.final_decision.criteria_passed,
                confidence_global: outcome.final_decision.confidence_global,
                accion_requerida: outcome.final_decision.accion_requerida.clone(),
                total_functions: outcome.total_functions,
            })
            .collect();

        let average_confidence = if total_positions == 0 {
            0.0
        } else {
            self.outcomes
                .iter()
                .map(|outcome| outcome.final_decision.confidence_global)
                .sum::<f64>()
                / total_positions as f64
        };

        BatchReportSummary {
            total_positions,
            approved,
            rejected: total_positions - approved,
            approval_rate: ratio(approved, total_positions),
            average_confidence,
            criteria,
            levels,
            positions,
        }
    }

    /// Plain-text rendering for terminals and log attachments.
    pub fn render_text(&self, include_findings: bool) -> String {
        let summary = self.summary();
        let mut out = String::new();

        writeln!(out, "Validación de descripciones de puesto").expect("write title");
        writeln!(
            out,
            "Puestos: {} | aprobados: {} | rechazados: {} | tasa de aprobación {:.1}%",
            summary.total_positions,
            summary.approved,
            summary.rejected,
            summary.approval_rate * 100.0
        )
        .expect("write totals");
        writeln!(out, "Confianza promedio: {:.2}", summary.average_confidence)
            .expect("write confidence");

        writeln!(out, "\nCriterios").expect("write criteria header");
        for entry in &summary.criteria {
            writeln!(
                out,
                "- {}: {}/{} aprobados ({:.1}%)",
                entry.criterion_label,
                entry.passed,
                entry.total,
                entry.pass_rate * 100.0
            )
            .expect("write criterion");
        }

        if !summary.levels.is_empty() {
            writeln!(out, "\nNiveles").expect("write levels header");
            for entry in &summary.levels {
                writeln!(
                    out,
                    "- {:?} ({}): {} aprobados, {} rechazados",
                    entry.letter, entry.letter_label, entry.approved, entry.rejected
                )
                .expect("write level");
            }
        }

        writeln!(out, "\nPuestos").expect("write positions header");
        for outcome in &self.outcomes {
            let decision = &outcome.final_decision;
            writeln!(
                out,
                "- {} [{}] {}",
                outcome.position_id.0,
                outcome.level.level_code,
                decision.summary()
            )
            .expect("write position");

            if include_findings {
                for result in &outcome.criteria {
                    writeln!(out, "    {}", result.reasoning).expect("write reasoning");
                    for finding in &result.findings {
                        writeln!(
                            out,
                            "      {} {}: {}",
                            finding.severity.label(),
                            finding.function_id.0,
                            finding.detail
                        )
                        .expect("write finding");
                    }
                }
            }
        }

        out
    }
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
