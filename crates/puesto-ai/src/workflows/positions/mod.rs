//! Job-position function validation: salary-level profiles, the three
//! validation criteria and the 2-of-3 final decision.

pub mod domain;
pub mod evaluation;
pub mod intake;
pub mod levels;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Alignment, ComplexityLevel, DecisionScope, ErrorConsequences, FunctionId, FunctionJudgment,
    LevelLetter, PositionId, PositionInput,
};
pub use evaluation::{
    Classification, Criterion, CriterionResult, CriterionVerdict, EmptyPositionPolicy,
    EvaluationConfig, FinalDecision, Severity, ValidationEngine, ValidationOutcome,
};
pub use intake::{normalize_judge_response, RawFunctionJudgment, RawPositionPayload};
pub use levels::{
    extract_level_letter, get_acceptable_impact_ranges, get_expected_impact_profile,
    get_threshold_for_level, AcceptableRanges, ImpactProfile, LevelContext,
    LevelProfileResolver, ThresholdTable,
};
pub use report::BatchReport;
pub use repository::{
    NotifierError, RepositoryError, ReviewNotifier, ReviewRequest, ValidationRecord,
    ValidationRepository, ValidationStatusView,
};
pub use router::position_router;
pub use service::{PositionValidationService, ServiceError};
