//! Salary-level lookups: expected impact profile, acceptable ranges and the
//! tolerated fraction of critical functions per hierarchy tier.
//!
//! The tables are static. Senior tiers accept a wide spread of impact values
//! because their functions legitimately vary; junior tiers accept little more
//! than the ideal value.

use serde::{Deserialize, Serialize};

use super::domain::{ComplexityLevel, DecisionScope, ErrorConsequences, LevelLetter};

/// Letter returned when a code has no usable leading letter.
pub const FALLBACK_LEVEL_LETTER: char = 'P';

/// Single ideal value per impact axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactProfile {
    pub decision_scope: DecisionScope,
    pub error_consequences: ErrorConsequences,
    pub complexity_level: ComplexityLevel,
}

/// Values tolerated per impact axis for a tier. Always a superset of the ideal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptableRanges {
    pub decision_scope: Vec<DecisionScope>,
    pub error_consequences: Vec<ErrorConsequences>,
    pub complexity_level: Vec<ComplexityLevel>,
}

impl AcceptableRanges {
    pub fn accepts_scope(&self, value: DecisionScope) -> bool {
        self.decision_scope.contains(&value)
    }

    pub fn accepts_consequences(&self, value: ErrorConsequences) -> bool {
        self.error_consequences.contains(&value)
    }

    pub fn accepts_complexity(&self, value: ComplexityLevel) -> bool {
        self.complexity_level.contains(&value)
    }
}

/// Maximum tolerated critical rate per tier group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub senior: f64,
    pub executive: f64,
    pub middle: f64,
    pub operational: f64,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            senior: 0.80,
            executive: 0.70,
            middle: 0.60,
            operational: 0.50,
        }
    }
}

impl ThresholdTable {
    pub fn for_letter(&self, letter: LevelLetter) -> f64 {
        let raw = match letter {
            LevelLetter::G | LevelLetter::H => self.senior,
            LevelLetter::J | LevelLetter::K => self.executive,
            LevelLetter::L | LevelLetter::M | LevelLetter::N => self.middle,
            LevelLetter::O | LevelLetter::P => self.operational,
        };
        clamp_unit(raw)
    }
}

/// Everything resolved for a salary-level code in one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelContext {
    pub level_code: String,
    pub letter: LevelLetter,
    pub expected_profile: ImpactProfile,
    pub acceptable_ranges: AcceptableRanges,
    pub threshold: f64,
}

/// Resolver carrying the configured threshold table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelProfileResolver {
    thresholds: ThresholdTable,
}

impl LevelProfileResolver {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn threshold_for(&self, code: &str) -> f64 {
        self.thresholds.for_letter(LevelLetter::from_code(code))
    }

    pub fn resolve(&self, code: &str) -> LevelContext {
        let letter = LevelLetter::from_code(code);
        LevelContext {
            level_code: code.trim().to_string(),
            letter,
            expected_profile: profile_for_letter(letter),
            acceptable_ranges: ranges_for_letter(letter),
            threshold: self.thresholds.for_letter(letter),
        }
    }
}

/// Returns the uppercased leading letter of `code`, or `'P'` when the code is
/// empty or does not start with a letter.
pub fn extract_level_letter(code: &str) -> char {
    match code.trim().chars().next() {
        Some(first) if first.is_ascii_alphabetic() => first.to_ascii_uppercase(),
        _ => FALLBACK_LEVEL_LETTER,
    }
}

pub fn get_expected_impact_profile(code: &str) -> ImpactProfile {
    profile_for_letter(LevelLetter::from_code(code))
}

pub fn get_acceptable_impact_ranges(code: &str) -> AcceptableRanges {
    ranges_for_letter(LevelLetter::from_code(code))
}

pub fn get_threshold_for_level(code: &str) -> f64 {
    LevelProfileResolver::default().threshold_for(code)
}

pub fn profile_for_letter(letter: LevelLetter) -> ImpactProfile {
    use ComplexityLevel as C;
    use DecisionScope as S;
    use ErrorConsequences as E;

    let (decision_scope, error_consequences, complexity_level) = match letter {
        LevelLetter::G => (S::StrategicNational, E::Systemic, C::Innovative),
        LevelLetter::H => (S::StrategicNational, E::Strategic, C::Transformational),
        LevelLetter::J => (S::Interinstitutional, E::Strategic, C::Transformational),
        LevelLetter::K => (S::Interinstitutional, E::Strategic, C::Strategic),
        LevelLetter::L => (S::Institutional, E::Tactical, C::Strategic),
        LevelLetter::M | LevelLetter::N => (S::Institutional, E::Tactical, C::Analytical),
        LevelLetter::O => (S::Local, E::Operational, C::Analytical),
        LevelLetter::P => (S::Local, E::Operational, C::Routine),
    };

    ImpactProfile {
        decision_scope,
        error_consequences,
        complexity_level,
    }
}

pub fn ranges_for_letter(letter: LevelLetter) -> AcceptableRanges {
    use ComplexityLevel as C;
    use DecisionScope as S;
    use ErrorConsequences as E;

    match letter {
        LevelLetter::G | LevelLetter::H => AcceptableRanges {
            decision_scope: vec![S::Institutional, S::Interinstitutional, S::StrategicNational],
            error_consequences: vec![E::Tactical, E::Strategic, E::Systemic],
            complexity_level: vec![C::Analytical, C::Strategic, C::Transformational, C::Innovative],
        },
        LevelLetter::J | LevelLetter::K => AcceptableRanges {
            decision_scope: vec![S::Institutional, S::Interinstitutional, S::StrategicNational],
            error_consequences: vec![E::Tactical, E::Strategic, E::Systemic],
            complexity_level: vec![C::Analytical, C::Strategic, C::Transformational],
        },
        LevelLetter::L | LevelLetter::M | LevelLetter::N => AcceptableRanges {
            decision_scope: vec![S::Local, S::Institutional, S::Interinstitutional],
            error_consequences: vec![E::Operational, E::Tactical, E::Strategic],
            complexity_level: vec![C::Routine, C::Analytical, C::Strategic],
        },
        LevelLetter::O => AcceptableRanges {
            decision_scope: vec![S::Local, S::Institutional],
            error_consequences: vec![E::Operational, E::Tactical],
            complexity_level: vec![C::Routine, C::Analytical],
        },
        LevelLetter::P => AcceptableRanges {
            decision_scope: vec![S::Local],
            error_consequences: vec![E::Operational],
            complexity_level: vec![C::Routine],
        },
    }
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
