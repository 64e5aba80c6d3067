use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::workflows::positions::domain::{fold_diacritic, FunctionJudgment};

const MIN_TOKEN_LEN: usize = 3;

const STOPWORDS: &[&str] = &[
    "las", "los", "del", "por", "para", "con", "sin", "que", "una", "uno", "unos", "unas", "sus",
    "este", "esta", "estos", "estas", "ese", "esa", "como", "entre", "sobre", "ante", "bajo",
    "desde", "hacia", "hasta", "segun", "mediante", "asi", "cual", "cuales", "donde", "cuando",
    "mas", "muy", "ser", "son", "sea", "han", "fin", "the", "and", "for", "with",
];

/// A regulation excerpt that can back a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormativeFragment {
    pub id: String,
    pub source: String,
    pub text: String,
}

/// Search hit with its Jaccard similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormativeMatch {
    pub fragment_id: String,
    pub source: String,
    pub score: f64,
}

#[derive(Debug, Clone)]
struct IndexedFragment {
    fragment: NormativeFragment,
    tokens: BTreeSet<String>,
}

/// Keyword index over pre-tokenized fragments. Used when no semantic
/// search is available.
#[derive(Debug, Clone, Default)]
pub struct NormativeIndex {
    entries: Vec<IndexedFragment>,
}

impl NormativeIndex {
    pub fn build(fragments: impl IntoIterator<Item = NormativeFragment>) -> Self {
        let entries = fragments
            .into_iter()
            .map(|fragment| {
                let tokens = tokenize(&fragment.text);
                IndexedFragment { fragment, tokens }
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<NormativeMatch> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<NormativeMatch> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let score = jaccard(&query_tokens, &entry.tokens);
                (score > 0.0).then(|| NormativeMatch {
                    fragment_id: entry.fragment.id.clone(),
                    source: entry.fragment.source.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.fragment_id.cmp(&b.fragment_id))
        });
        hits.truncate(limit);
        hits
    }

    /// Best fragment backing the function, if it clears `min_score`.
    pub fn find_backing(
        &self,
        function: &FunctionJudgment,
        min_score: f64,
    ) -> Option<NormativeMatch> {
        let query = format!("{} {}", function.verb, function.description);
        self.search(&query, 1)
            .into_iter()
            .next()
            .filter(|hit| hit.score >= min_score)
    }
}

pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .map(|word| {
            word.chars()
                .flat_map(char::to_lowercase)
                .map(fold_diacritic)
                .collect::<String>()
        })
        .filter(|word| word.chars().count() >= MIN_TOKEN_LEN)
        .filter(|word| !STOPWORDS.contains(&word.as_str()))
        .collect()
}

pub fn jaccard(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let intersection = left.intersection(right).count();
    let union = left.len() + right.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::positions::domain::{
        Alignment, ComplexityLevel, DecisionScope, ErrorConsequences, FunctionId,
    };

    fn fragments() -> Vec<NormativeFragment> {
        vec![
            NormativeFragment {
                id: "RISFP-7".to_string(),
                source: "Reglamento Interior".to_string(),
                text: "Coordinar la integración del programa anual de adquisiciones de la dependencia"
                    .to_string(),
            },
            NormativeFragment {
                id: "LGRA-12".to_string(),
                source: "Ley General de Responsabilidades".to_string(),
                text: "Vigilar el cumplimiento de las obligaciones de los servidores públicos"
                    .to_string(),
            },
        ]
    }

    fn function(verb: &str, description: &str) -> FunctionJudgment {
        FunctionJudgment {
            id: FunctionId("F1".to_string()),
            description: description.to_string(),
            verb: verb.to_string(),
            detected_scope: DecisionScope::Institutional,
            detected_consequences: ErrorConsequences::Tactical,
            detected_complexity: ComplexityLevel::Analytical,
            verb_appropriate: true,
            verb_forbidden: false,
            has_external_backing: false,
            alignment: Alignment::Aligned,
        }
    }

    #[test]
    fn tokenize_folds_accents_and_drops_stopwords() {
        let tokens = tokenize("Integración de las políticas, para el Área");
        assert!(tokens.contains("integracion"));
        assert!(tokens.contains("politicas"));
        assert!(tokens.contains("area"));
        assert!(!tokens.contains("las"));
        assert!(!tokens.contains("para"));
        assert!(!tokens.contains("de"));
    }

    #[test]
    fn jaccard_of_disjoint_or_empty_sets_is_zero() {
        let left = tokenize("adquisiciones programa");
        let right = tokenize("servidores obligaciones");
        assert_eq!(jaccard(&left, &right), 0.0);
        assert_eq!(jaccard(&left, &BTreeSet::new()), 0.0);
        assert_eq!(jaccard(&left, &left), 1.0);
    }

    #[test]
    fn search_ranks_best_overlap_first() {
        let index = NormativeIndex::build(fragments());
        let hits = index.search("coordinar el programa anual de adquisiciones", 5);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fragment_id, "RISFP-7");
        assert!(hits[0].score > 0.4);
    }

    #[test]
    fn search_with_no_usable_tokens_returns_nothing() {
        let index = NormativeIndex::build(fragments());
        assert!(index.search("de la el", 5).is_empty());
        assert!(index.search("adquisiciones", 0).is_empty());
    }

    #[test]
    fn find_backing_respects_minimum_score() {
        let index = NormativeIndex::build(fragments());
        let candidate = function(
            "Vigilar",
            "el cumplimiento de las obligaciones de los servidores públicos del área",
        );

        let hit = index
            .find_backing(&candidate, 0.25)
            .expect("backing expected");
        assert_eq!(hit.fragment_id, "LGRA-12");
        assert!(index.find_backing(&candidate, 0.99).is_none());
    }
}
