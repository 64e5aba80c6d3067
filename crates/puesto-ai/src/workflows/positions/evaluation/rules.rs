use serde::{Deserialize, Serialize};

use super::super::domain::{Alignment, FunctionId, FunctionJudgment};
use super::super::levels::{clamp_unit, LevelContext};
use super::config::{EmptyPositionPolicy, EvaluationConfig};

const CONFIDENCE_FLOOR: f64 = 0.70;
const CONFIDENCE_CAP: f64 = 0.90;

/// The three independent validation criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    #[serde(rename = "congruencia_verbal")]
    VerbCongruence,
    #[serde(rename = "alineacion_normativa")]
    NormativeAlignment,
    #[serde(rename = "impacto_jerarquico")]
    ImpactCoherence,
}

impl Criterion {
    pub const fn ordered() -> [Criterion; 3] {
        [
            Criterion::VerbCongruence,
            Criterion::NormativeAlignment,
            Criterion::ImpactCoherence,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::VerbCongruence => "congruencia_verbal",
            Self::NormativeAlignment => "alineacion_normativa",
            Self::ImpactCoherence => "impacto_jerarquico",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VerbCongruence => "Congruencia verbal",
            Self::NormativeAlignment => "Alineación normativa",
            Self::ImpactCoherence => "Impacto jerárquico",
        }
    }
}

/// Per-function outcome for one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    Moderate,
    Approved,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Moderate => "MODERATE",
            Self::Approved => "APPROVED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionVerdict {
    Pass,
    Fail,
}

impl CriterionVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }

    pub const fn passed(self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Non-approved function recorded for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionFinding {
    pub function_id: FunctionId,
    pub severity: Severity,
    pub detail: String,
}

/// Outcome of one criterion over every function of a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub name: Criterion,
    pub result: CriterionVerdict,
    pub critical_count: usize,
    pub moderate_count: usize,
    pub approved_count: usize,
    pub critical_rate: f64,
    pub threshold: f64,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<FunctionFinding>,
}

impl CriterionResult {
    pub fn total_functions(&self) -> usize {
        self.critical_count + self.moderate_count + self.approved_count
    }

    pub fn passed(&self) -> bool {
        self.result.passed()
    }
}

/// Classifies a single function for one criterion.
pub trait CriterionEvaluator: Send + Sync {
    fn criterion(&self) -> Criterion;

    fn classify(&self, function: &FunctionJudgment, level: &LevelContext) -> (Severity, String);
}

/// Forbidden verbs are always critical; inappropriate verbs are mitigated by backing.
pub struct VerbCongruenceEvaluator;

impl CriterionEvaluator for VerbCongruenceEvaluator {
    fn criterion(&self) -> Criterion {
        Criterion::VerbCongruence
    }

    fn classify(&self, function: &FunctionJudgment, level: &LevelContext) -> (Severity, String) {
        if function.verb_forbidden {
            return (
                Severity::Critical,
                format!(
                    "verbo '{}' prohibido para el nivel {}",
                    function.verb, level.level_code
                ),
            );
        }

        if function.verb_appropriate {
            return (Severity::Approved, String::new());
        }

        mitigated(
            function,
            format!(
                "verbo '{}' no corresponde al nivel {}",
                function.verb, level.level_code
            ),
        )
    }
}

/// Uses the judge's alignment label against institutional regulations.
pub struct NormativeAlignmentEvaluator;

impl CriterionEvaluator for NormativeAlignmentEvaluator {
    fn criterion(&self) -> Criterion {
        Criterion::NormativeAlignment
    }

    fn classify(&self, function: &FunctionJudgment, _level: &LevelContext) -> (Severity, String) {
        match function.alignment {
            Alignment::Aligned => (Severity::Approved, String::new()),
            Alignment::Partial => (
                Severity::Moderate,
                "alineación parcial con la normativa".to_string(),
            ),
            Alignment::NotAligned => {
                mitigated(function, "sin alineación con la normativa".to_string())
            }
            Alignment::Unassessed => {
                mitigated(function, "alineación normativa no evaluada".to_string())
            }
        }
    }
}

/// Range membership of all three impact axes for the position's tier.
pub struct ImpactCoherenceEvaluator;

impl CriterionEvaluator for ImpactCoherenceEvaluator {
    fn criterion(&self) -> Criterion {
        Criterion::ImpactCoherence
    }

    fn classify(&self, function: &FunctionJudgment, level: &LevelContext) -> (Severity, String) {
        let ranges = &level.acceptable_ranges;
        let mut outside = Vec::new();

        if !ranges.accepts_scope(function.detected_scope) {
            outside.push(format!("alcance {}", function.detected_scope));
        }
        if !ranges.accepts_consequences(function.detected_consequences) {
            outside.push(format!("consecuencias {}", function.detected_consequences));
        }
        if !ranges.accepts_complexity(function.detected_complexity) {
            outside.push(format!("complejidad {}", function.detected_complexity));
        }

        if outside.is_empty() {
            return (Severity::Approved, String::new());
        }

        mitigated(
            function,
            format!(
                "{} fuera del rango aceptable para el nivel {}",
                outside.join(", "),
                level.letter.as_char()
            ),
        )
    }
}

fn mitigated(function: &FunctionJudgment, detail: String) -> (Severity, String) {
    if function.has_external_backing {
        (Severity::Moderate, format!("{detail} (con respaldo externo)"))
    } else {
        (Severity::Critical, detail)
    }
}

/// Shared driver: classify every function, aggregate and decide.
pub fn evaluate_criterion(
    evaluator: &dyn CriterionEvaluator,
    functions: &[FunctionJudgment],
    level: &LevelContext,
    config: &EvaluationConfig,
) -> CriterionResult {
    let criterion = evaluator.criterion();
    let threshold = clamp_unit(level.threshold);
    let mut critical_count = 0;
    let mut moderate_count = 0;
    let mut approved_count = 0;
    let mut findings = Vec::new();

    for function in functions {
        let (severity, detail) = evaluator.classify(function, level);
        match severity {
            Severity::Critical => critical_count += 1,
            Severity::Moderate => moderate_count += 1,
            Severity::Approved => approved_count += 1,
        }
        if severity != Severity::Approved {
            findings.push(FunctionFinding {
                function_id: function.id.clone(),
                severity,
                detail,
            });
        }
    }

    let total = functions.len();
    let critical_rate = critical_rate(critical_count, total);
    let result = if total == 0 {
        match config.empty_position_policy {
            EmptyPositionPolicy::Pass => CriterionVerdict::Pass,
            EmptyPositionPolicy::Fail => CriterionVerdict::Fail,
        }
    } else {
        decide_verdict(critical_rate, threshold, config.tolerance)
    };
    let confidence = criterion_confidence(critical_rate, threshold);

    let reasoning = if total == 0 {
        format!(
            "{}: sin funciones declaradas; resultado {}",
            criterion.label(),
            result.label()
        )
    } else {
        format!(
            "{}: {} críticas, {} moderadas, {} aprobadas de {} funciones; tasa crítica {:.1}% frente a umbral {:.1}%; resultado {}",
            criterion.label(),
            critical_count,
            moderate_count,
            approved_count,
            total,
            critical_rate * 100.0,
            threshold * 100.0,
            result.label()
        )
    };

    CriterionResult {
        name: criterion,
        result,
        critical_count,
        moderate_count,
        approved_count,
        critical_rate,
        threshold,
        confidence,
        reasoning,
        findings,
    }
}

pub fn critical_rate(critical_count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        critical_count as f64 / total as f64
    }
}

pub fn decide_verdict(critical_rate: f64, threshold: f64, tolerance: f64) -> CriterionVerdict {
    if critical_rate <= threshold + tolerance.max(0.0) {
        CriterionVerdict::Pass
    } else {
        CriterionVerdict::Fail
    }
}

/// Grows with the distance between the observed rate and the threshold.
pub fn criterion_confidence(critical_rate: f64, threshold: f64) -> f64 {
    (CONFIDENCE_FLOOR + (critical_rate - threshold).abs()).min(CONFIDENCE_CAP)
}
