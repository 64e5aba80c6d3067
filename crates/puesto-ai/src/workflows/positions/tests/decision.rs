use crate::workflows::positions::evaluation::{
    combine_criteria, Classification, Criterion, CriterionResult, CriterionVerdict,
    EvaluationConfig,
};

fn result(name: Criterion, passed: bool, confidence: f64) -> CriterionResult {
    CriterionResult {
        name,
        result: if passed {
            CriterionVerdict::Pass
        } else {
            CriterionVerdict::Fail
        },
        critical_count: 0,
        moderate_count: 0,
        approved_count: 0,
        critical_rate: 0.0,
        threshold: 0.5,
        confidence,
        reasoning: format!("{} evaluado", name.label()),
        findings: Vec::new(),
    }
}

fn criteria(flags: [bool; 3]) -> [CriterionResult; 3] {
    let [verb, alignment, impact] = Criterion::ordered();
    [
        result(verb, flags[0], 0.7),
        result(alignment, flags[1], 0.8),
        result(impact, flags[2], 0.9),
    ]
}

#[test]
fn two_of_three_majority_over_every_combination() {
    let config = EvaluationConfig::default();

    for mask in 0u8..8 {
        let flags = [mask & 1 != 0, mask & 2 != 0, mask & 4 != 0];
        let passed = flags.iter().filter(|flag| **flag).count();
        let decision = combine_criteria(&criteria(flags), &config);

        assert_eq!(decision.criteria_passed as usize, passed, "{flags:?}");
        let expected = if passed >= 2 {
            Classification::Aprobado
        } else {
            Classification::Rechazado
        };
        assert_eq!(decision.classification, expected, "{flags:?}");
    }
}

#[test]
fn action_follows_classification() {
    let config = EvaluationConfig::default();

    let approved = combine_criteria(&criteria([true, true, false]), &config);
    assert_eq!(approved.accion_requerida, "Ninguna");

    let rejected = combine_criteria(&criteria([true, false, false]), &config);
    assert_eq!(rejected.accion_requerida, "Revisión manual");
}

#[test]
fn global_confidence_is_the_mean_of_criteria() {
    let decision = combine_criteria(&criteria([true, true, true]), &EvaluationConfig::default());

    assert!((decision.confidence_global - 0.8).abs() < 1e-9);
}

#[test]
fn reasoning_lists_every_criterion() {
    let decision = combine_criteria(&criteria([false, true, true]), &EvaluationConfig::default());
    let lines: Vec<_> = decision.reasoning.lines().collect();

    assert_eq!(lines[0], "Puesto APROBADO: 2 de 3 criterios aprobados.");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "Congruencia verbal evaluado");
    assert!(decision.summary().starts_with("APROBADO (2/3"));
}

#[test]
fn custom_actions_are_used() {
    let config = EvaluationConfig {
        rejected_action: "Turnar a comité".to_string(),
        ..EvaluationConfig::default()
    };
    let decision = combine_criteria(&criteria([false, false, false]), &config);

    assert_eq!(decision.accion_requerida, "Turnar a comité");
}
