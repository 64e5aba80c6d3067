use serde::{Deserialize, Serialize};

use super::config::EvaluationConfig;
use super::rules::CriterionResult;

/// Minimum number of passing criteria for approval.
pub const REQUIRED_PASSING_CRITERIA: usize = 2;

/// Overall classification of a job position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "APROBADO")]
    Aprobado,
    #[serde(rename = "RECHAZADO")]
    Rechazado,
}

impl Classification {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aprobado => "APROBADO",
            Self::Rechazado => "RECHAZADO",
        }
    }

    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Aprobado)
    }
}

/// Terminal verdict combining the three criterion results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    pub classification: Classification,
    pub criteria_passed: u8,
    pub confidence_global: f64,
    pub accion_requerida: String,
    pub reasoning: String,
}

impl FinalDecision {
    pub fn summary(&self) -> String {
        format!(
            "{} ({}/3 criterios aprobados, confianza {:.2}); acción requerida: {}",
            self.classification.label(),
            self.criteria_passed,
            self.confidence_global,
            self.accion_requerida
        )
    }
}

/// 2-of-3 majority over the criterion results. Pure.
pub fn combine_criteria(
    criteria: &[CriterionResult; 3],
    config: &EvaluationConfig,
) -> FinalDecision {
    let criteria_passed = criteria.iter().filter(|result| result.passed()).count();

    let classification = if criteria_passed >= REQUIRED_PASSING_CRITERIA {
        Classification::Aprobado
    } else {
        Classification::Rechazado
    };

    let confidence_global =
        criteria.iter().map(|result| result.confidence).sum::<f64>() / criteria.len() as f64;

    let accion_requerida = if classification.is_approved() {
        config.approved_action.clone()
    } else {
        config.rejected_action.clone()
    };

    let mut reasoning = format!(
        "Puesto {}: {} de {} criterios aprobados.",
        classification.label(),
        criteria_passed,
        criteria.len()
    );
    for result in criteria {
        reasoning.push('\n');
        reasoning.push_str(&result.reasoning);
    }

    FinalDecision {
        classification,
        criteria_passed: criteria_passed as u8,
        confidence_global,
        accion_requerida,
        reasoning,
    }
}
