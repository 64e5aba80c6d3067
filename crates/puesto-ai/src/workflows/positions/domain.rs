use serde::{Deserialize, Serialize};

/// Identifier wrapper for a job position under validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionId(pub String);

/// Identifier wrapper for a single function of a position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionId(pub String);

/// Hierarchy tier derived from the leading letter of a salary-level code.
///
/// `G` carries the highest authority and `P` the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LevelLetter {
    G,
    H,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
}

impl LevelLetter {
    pub const fn ordered() -> [LevelLetter; 9] {
        [
            LevelLetter::G,
            LevelLetter::H,
            LevelLetter::J,
            LevelLetter::K,
            LevelLetter::L,
            LevelLetter::M,
            LevelLetter::N,
            LevelLetter::O,
            LevelLetter::P,
        ]
    }

    pub fn from_char(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'G' => Some(Self::G),
            'H' => Some(Self::H),
            'J' => Some(Self::J),
            'K' => Some(Self::K),
            'L' => Some(Self::L),
            'M' => Some(Self::M),
            'N' => Some(Self::N),
            'O' => Some(Self::O),
            'P' => Some(Self::P),
            _ => None,
        }
    }

    /// Resolves a salary-level code, falling back to the most restrictive tier.
    pub fn from_code(code: &str) -> Self {
        Self::from_char(super::levels::extract_level_letter(code)).unwrap_or(Self::P)
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::G => 'G',
            Self::H => 'H',
            Self::J => 'J',
            Self::K => 'K',
            Self::L => 'L',
            Self::M => 'M',
            Self::N => 'N',
            Self::O => 'O',
            Self::P => 'P',
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::G => "Secretaría de Estado",
            Self::H => "Subsecretaría / Oficialía Mayor",
            Self::J => "Jefatura de Unidad",
            Self::K => "Dirección General",
            Self::L => "Dirección General Adjunta",
            Self::M => "Dirección de Área",
            Self::N => "Subdirección de Área",
            Self::O => "Jefatura de Departamento",
            Self::P => "Enlace",
        }
    }
}

/// Reach of the decisions a function exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DecisionScope {
    Local,
    Institutional,
    Interinstitutional,
    StrategicNational,
    Unclassified,
}

impl DecisionScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Institutional => "institutional",
            Self::Interinstitutional => "interinstitutional",
            Self::StrategicNational => "strategic_national",
            Self::Unclassified => "unclassified",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        match canonical_label(raw).as_str() {
            "local" | "operativo_local" => Self::Local,
            "institutional" | "institucional" => Self::Institutional,
            "interinstitutional" | "interinstitucional" => Self::Interinstitutional,
            "strategic_national" | "estrategico_nacional" | "nacional" | "national" => {
                Self::StrategicNational
            }
            _ => Self::Unclassified,
        }
    }
}

/// Severity of the consequences an error in the function would cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorConsequences {
    Operational,
    Tactical,
    Strategic,
    Systemic,
    Unclassified,
}

impl ErrorConsequences {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Tactical => "tactical",
            Self::Strategic => "strategic",
            Self::Systemic => "systemic",
            Self::Unclassified => "unclassified",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        match canonical_label(raw).as_str() {
            "operational" | "operativo" | "operativa" | "operacional" => Self::Operational,
            "tactical" | "tactico" | "tactica" => Self::Tactical,
            "strategic" | "estrategico" | "estrategica" => Self::Strategic,
            "systemic" | "sistemico" | "sistemica" => Self::Systemic,
            _ => Self::Unclassified,
        }
    }
}

/// Cognitive complexity required to perform the function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComplexityLevel {
    Routine,
    Analytical,
    Strategic,
    Transformational,
    Innovative,
    Unclassified,
}

impl ComplexityLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Analytical => "analytical",
            Self::Strategic => "strategic",
            Self::Transformational => "transformational",
            Self::Innovative => "innovative",
            Self::Unclassified => "unclassified",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        match canonical_label(raw).as_str() {
            "routine" | "rutinaria" | "rutinario" => Self::Routine,
            "analytical" | "analitica" | "analitico" => Self::Analytical,
            "strategic" | "estrategica" | "estrategico" => Self::Strategic,
            "transformational" | "transformacional" => Self::Transformational,
            "innovative" | "innovadora" | "innovador" => Self::Innovative,
            _ => Self::Unclassified,
        }
    }
}

/// Judge verdict on how well a function matches the institutional regulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Alignment {
    Aligned,
    Partial,
    NotAligned,
    Unassessed,
}

impl Alignment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aligned => "aligned",
            Self::Partial => "partial",
            Self::NotAligned => "not_aligned",
            Self::Unassessed => "unassessed",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        match canonical_label(raw).as_str() {
            "aligned" | "alineada" | "alineado" | "fuerte" | "strong" => Self::Aligned,
            "partial" | "parcial" | "moderada" | "moderate" => Self::Partial,
            "not_aligned" | "no_alineada" | "no_alineado" | "nula" | "debil" | "weak"
            | "none" => Self::NotAligned,
            _ => Self::Unassessed,
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::Unassessed
    }
}

macro_rules! label_conversions {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<String> for $ty {
                fn from(value: String) -> Self {
                    Self::from_label(&value)
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.as_str().to_string()
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

label_conversions!(DecisionScope, ErrorConsequences, ComplexityLevel, Alignment);

/// One assessed function of a job position, already normalized at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionJudgment {
    pub id: FunctionId,
    pub description: String,
    pub verb: String,
    pub detected_scope: DecisionScope,
    pub detected_consequences: ErrorConsequences,
    pub detected_complexity: ComplexityLevel,
    pub verb_appropriate: bool,
    pub verb_forbidden: bool,
    pub has_external_backing: bool,
    #[serde(default)]
    pub alignment: Alignment,
}

/// Everything the engine needs to validate one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionInput {
    pub position_id: PositionId,
    pub level_code: String,
    pub functions: Vec<FunctionJudgment>,
}

/// Lowercases, strips Spanish diacritics and folds separators to `_`.
pub(crate) fn canonical_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for ch in raw.trim().chars() {
        let folded = fold_diacritic(ch.to_lowercase().next().unwrap_or(ch));
        if folded.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(folded);
        } else {
            pending_separator = true;
        }
    }

    out
}

pub(crate) fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}
