mod config;
mod policy;
mod rules;

pub use config::{
    EmptyPositionPolicy, EvaluationConfig, ACTION_MANUAL_REVIEW, ACTION_NONE,
    DEFAULT_BACKING_MIN_SCORE, DEFAULT_TOLERANCE,
};
pub use policy::{combine_criteria, Classification, FinalDecision, REQUIRED_PASSING_CRITERIA};
pub use rules::{
    critical_rate, criterion_confidence, decide_verdict, evaluate_criterion, Criterion,
    CriterionEvaluator, CriterionResult, CriterionVerdict, FunctionFinding,
    ImpactCoherenceEvaluator, NormativeAlignmentEvaluator, Severity, VerbCongruenceEvaluator,
};

use std::borrow::Cow;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{FunctionId, FunctionJudgment, PositionId, PositionInput};
use super::levels::{LevelContext, LevelProfileResolver};
use crate::workflows::normative::{NormativeIndex, NormativeMatch};

/// Stateless engine running resolver, the three criteria and the combiner.
pub struct ValidationEngine {
    config: EvaluationConfig,
    resolver: LevelProfileResolver,
    evaluators: [Box<dyn CriterionEvaluator>; 3],
    backing_index: Option<Arc<NormativeIndex>>,
}

impl ValidationEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        let resolver = LevelProfileResolver::new(config.thresholds);
        let evaluators: [Box<dyn CriterionEvaluator>; 3] = [
            Box::new(VerbCongruenceEvaluator),
            Box::new(NormativeAlignmentEvaluator),
            Box::new(ImpactCoherenceEvaluator),
        ];

        Self {
            config,
            resolver,
            evaluators,
            backing_index: None,
        }
    }

    /// Fills missing backing from the given regulation index before scoring.
    pub fn with_backing_search(mut self, index: Arc<NormativeIndex>) -> Self {
        self.backing_index = Some(index);
        self
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn resolver(&self) -> &LevelProfileResolver {
        &self.resolver
    }

    pub fn validate(&self, position: &PositionInput) -> ValidationOutcome {
        let level = self.resolver.resolve(&position.level_code);
        let (functions, backing) = self.apply_backing_search(&position.functions);

        let criteria = [
            self.run_criterion(0, &functions, &level, &position.position_id),
            self.run_criterion(1, &functions, &level, &position.position_id),
            self.run_criterion(2, &functions, &level, &position.position_id),
        ];

        let decision = combine_criteria(&criteria, &self.config);
        info!(
            position = %position.position_id.0,
            level = %level.level_code,
            classification = decision.classification.label(),
            criteria_passed = decision.criteria_passed,
            confidence = decision.confidence_global,
            "position validated"
        );

        ValidationOutcome {
            position_id: position.position_id.clone(),
            level,
            total_functions: functions.len(),
            criteria,
            final_decision: decision,
            backing,
        }
    }

    /// Positions are independent, so they are scored in parallel. Output
    /// order follows input order.
    pub fn validate_batch(&self, positions: &[PositionInput]) -> Vec<ValidationOutcome> {
        positions
            .par_iter()
            .map(|position| self.validate(position))
            .collect()
    }

    fn run_criterion(
        &self,
        slot: usize,
        functions: &[FunctionJudgment],
        level: &LevelContext,
        position_id: &PositionId,
    ) -> CriterionResult {
        let result =
            evaluate_criterion(self.evaluators[slot].as_ref(), functions, level, &self.config);
        debug!(
            position = %position_id.0,
            criterion = result.name.key(),
            result = result.result.label(),
            critical_rate = result.critical_rate,
            threshold = result.threshold,
            "criterion evaluated"
        );
        result
    }

    fn apply_backing_search<'a>(
        &self,
        functions: &'a [FunctionJudgment],
    ) -> (Cow<'a, [FunctionJudgment]>, Vec<BackingReference>) {
        let Some(index) = self.backing_index.as_deref() else {
            return (Cow::Borrowed(functions), Vec::new());
        };

        let mut backing = Vec::new();
        let mut enriched = functions.to_vec();
        for function in enriched.iter_mut().filter(|f| !f.has_external_backing) {
            if let Some(hit) = index.find_backing(function, self.config.backing_min_score) {
                function.has_external_backing = true;
                backing.push(BackingReference {
                    function_id: function.id.clone(),
                    normative: hit,
                });
            }
        }

        if backing.is_empty() {
            (Cow::Borrowed(functions), backing)
        } else {
            (Cow::Owned(enriched), backing)
        }
    }
}

/// Backing found by the keyword search for a function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackingReference {
    pub function_id: FunctionId,
    pub normative: NormativeMatch,
}

/// Full validation output for one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub position_id: PositionId,
    pub level: LevelContext,
    pub total_functions: usize,
    pub criteria: [CriterionResult; 3],
    #[serde(rename = "final")]
    pub final_decision: FinalDecision,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backing: Vec<BackingReference>,
}

impl ValidationOutcome {
    pub fn criterion(&self, criterion: Criterion) -> &CriterionResult {
        match criterion {
            Criterion::VerbCongruence => &self.criteria[0],
            Criterion::NormativeAlignment => &self.criteria[1],
            Criterion::ImpactCoherence => &self.criteria[2],
        }
    }

    pub fn classification(&self) -> Classification {
        self.final_decision.classification
    }
}
