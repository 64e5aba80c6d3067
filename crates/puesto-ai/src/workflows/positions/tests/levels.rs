use crate::workflows::positions::domain::{
    ComplexityLevel, DecisionScope, ErrorConsequences, LevelLetter,
};
use crate::workflows::positions::levels::{
    extract_level_letter, get_acceptable_impact_ranges, get_expected_impact_profile,
    get_threshold_for_level, profile_for_letter, ranges_for_letter, LevelProfileResolver,
    ThresholdTable,
};

#[test]
fn extract_level_letter_uppercases_leading_letter() {
    assert_eq!(extract_level_letter("G11"), 'G');
    assert_eq!(extract_level_letter("m33"), 'M');
    assert_eq!(extract_level_letter("  k21 "), 'K');
}

#[test]
fn extract_level_letter_falls_back_to_p() {
    assert_eq!(extract_level_letter(""), 'P');
    assert_eq!(extract_level_letter("   "), 'P');
    assert_eq!(extract_level_letter("11G"), 'P');
    assert_eq!(extract_level_letter("-M3"), 'P');
}

#[test]
fn thresholds_follow_the_tier_table() {
    assert_eq!(get_threshold_for_level("G11"), 0.80);
    assert_eq!(get_threshold_for_level("H21"), 0.80);
    assert_eq!(get_threshold_for_level("J31"), 0.70);
    assert_eq!(get_threshold_for_level("K11"), 0.70);
    assert_eq!(get_threshold_for_level("L21"), 0.60);
    assert_eq!(get_threshold_for_level("M33"), 0.60);
    assert_eq!(get_threshold_for_level("N11"), 0.60);
    assert_eq!(get_threshold_for_level("O21"), 0.50);
    assert_eq!(get_threshold_for_level("P11"), 0.50);
    assert_eq!(get_threshold_for_level("Z99"), 0.50);
    assert_eq!(get_threshold_for_level(""), 0.50);
}

#[test]
fn thresholds_are_bounded_and_relax_with_seniority() {
    let thresholds: Vec<f64> = LevelLetter::ordered()
        .into_iter()
        .map(|letter| get_threshold_for_level(&format!("{}11", letter.as_char())))
        .collect();

    assert!(thresholds.iter().all(|value| (0.0..=1.0).contains(value)));
    assert!(thresholds.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn configured_thresholds_are_clamped_to_unit_interval() {
    let resolver = LevelProfileResolver::new(ThresholdTable {
        senior: 1.4,
        executive: 0.7,
        middle: 0.6,
        operational: -0.2,
    });

    assert_eq!(resolver.threshold_for("G11"), 1.0);
    assert_eq!(resolver.threshold_for("P11"), 0.0);
}

#[test]
fn unknown_letters_resolve_to_lowest_authority_profile() {
    let profile = get_expected_impact_profile("X11");

    assert_eq!(profile.decision_scope, DecisionScope::Local);
    assert_eq!(profile.error_consequences, ErrorConsequences::Operational);
    assert_eq!(profile.complexity_level, ComplexityLevel::Routine);
    assert_eq!(get_acceptable_impact_ranges("X11"), ranges_for_letter(LevelLetter::P));
}

#[test]
fn acceptable_ranges_always_contain_the_ideal_profile() {
    for letter in LevelLetter::ordered() {
        let profile = profile_for_letter(letter);
        let ranges = ranges_for_letter(letter);

        assert!(ranges.accepts_scope(profile.decision_scope), "{letter:?} scope");
        assert!(
            ranges.accepts_consequences(profile.error_consequences),
            "{letter:?} consequences"
        );
        assert!(
            ranges.accepts_complexity(profile.complexity_level),
            "{letter:?} complexity"
        );
    }
}

#[test]
fn senior_ranges_are_wider_than_junior_ranges() {
    let senior = get_acceptable_impact_ranges("G11");
    let junior = get_acceptable_impact_ranges("P11");

    assert!(senior.complexity_level.len() > junior.complexity_level.len());
    assert_eq!(junior.decision_scope, vec![DecisionScope::Local]);
    assert_eq!(junior.error_consequences, vec![ErrorConsequences::Operational]);
    assert_eq!(junior.complexity_level, vec![ComplexityLevel::Routine]);
}

#[test]
fn unclassified_is_never_acceptable() {
    for letter in LevelLetter::ordered() {
        let ranges = ranges_for_letter(letter);
        assert!(!ranges.accepts_scope(DecisionScope::Unclassified));
        assert!(!ranges.accepts_consequences(ErrorConsequences::Unclassified));
        assert!(!ranges.accepts_complexity(ComplexityLevel::Unclassified));
    }
}

#[test]
fn resolver_bundles_everything_for_a_code() {
    let context = LevelProfileResolver::default().resolve(" m33 ");

    assert_eq!(context.level_code, "m33");
    assert_eq!(context.letter, LevelLetter::M);
    assert_eq!(context.threshold, 0.60);
    assert_eq!(context.expected_profile, profile_for_letter(LevelLetter::M));
}
