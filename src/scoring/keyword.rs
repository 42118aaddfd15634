//! Scores columns by the lowercase words in their name (spec.md §4.6.3): a
//! fact-only scorer (no dimension signal) with a multi-word path requiring
//! two or more exact dictionary matches, a single-word path with an exact
//! match or a conservative substring search, and a disqualification word
//! set (`id`, `identifier`, `key`, `uid`, `gid`, `uuid`) that flags columns
//! whose name reads as a key rather than a measure.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph::{GraphNode, NodeRecord, SchemaGraph};
use crate::scoring::{disqualify, ColumnScorer, NodeScore, ScoringObjective, GOOD, NORMAL};
use crate::visitor::{NavDirective, SchemaVisitor, VisitContext, VisitorError};
use crate::words::identifier_to_lc_words;

/// The replaceable dictionary driving [`KeywordScorer`] (spec.md §4.6.3:
/// "the dictionary is a replaceable input").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordDictionary {
    pub keywords: HashMap<String, i64>,
    pub disqualifying_words: HashSet<String>,
}

impl KeywordDictionary {
    /// The default English-language dictionary (spec.md §4.6.3).
    pub fn default_dictionary() -> Self {
        let keywords = [
            ("price", GOOD),
            ("qty", GOOD),
            ("quantity", GOOD),
            ("cost", GOOD),
            ("amount", GOOD),
            ("rate", GOOD),
            ("duration", GOOD),
            ("revenue", NORMAL),
            ("margin", NORMAL),
            ("discount", NORMAL),
            ("sale", NORMAL),
            ("quota", NORMAL),
            ("percent", NORMAL),
            ("pct", NORMAL),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let disqualifying_words =
            ["id", "identifier", "key", "uid", "gid", "uuid"].into_iter().map(String::from).collect();

        KeywordDictionary { keywords, disqualifying_words }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for KeywordDictionary {
    fn default() -> Self {
        Self::default_dictionary()
    }
}

/// Scores a column's split-word name against a [`KeywordDictionary`].
/// Fact-only: this scorer never contributes a dimension score.
#[derive(Debug)]
pub struct KeywordScorer {
    dictionary: KeywordDictionary,
    fact: ScoringObjective,
    dim: ScoringObjective,
}

impl KeywordScorer {
    pub fn new() -> Self {
        Self::with_dictionary(KeywordDictionary::default_dictionary())
    }

    pub fn with_dictionary(dictionary: KeywordDictionary) -> Self {
        KeywordScorer { dictionary, fact: ScoringObjective::new("fact"), dim: ScoringObjective::new("dim") }
    }

    /// Multi-word path: last word disqualifies independently of whether a
    /// score is also added; a score is added only when two or more words
    /// are exact dictionary matches (spec.md §4.6.3, §9's documented
    /// conservatism — a single incidental match in a compound name scores
    /// nothing).
    fn score_multi_word(&self, words: &[String]) -> (Option<String>, Option<(i64, String)>) {
        let disqualify_reason = words
            .last()
            .filter(|last| self.dictionary.disqualifying_words.contains(last.as_str()))
            .map(|last| format!("last word '{last}' indicates a key or identifier"));

        let matches: Vec<(&String, i64)> =
            words.iter().filter_map(|w| self.dictionary.keywords.get(w).map(|&s| (w, s))).collect();

        let score = if matches.len() >= 2 {
            let total: i64 = matches.iter().map(|(_, s)| *s).sum();
            let names: Vec<&str> = matches.iter().map(|(w, _)| w.as_str()).collect();
            Some((total, format!("keyword matches: {}", names.join(", "))))
        } else {
            None
        };

        (disqualify_reason, score)
    }

    /// Single-word path: disqualify-and-stop, else exact match, else a
    /// conservative substring search over the dictionary (spec.md §4.6.3).
    fn score_single_word(&self, word: &str) -> SingleWordOutcome {
        if self.dictionary.disqualifying_words.contains(word) {
            return SingleWordOutcome::Disqualify(format!("word '{word}' indicates a key or identifier"));
        }
        if let Some(&score) = self.dictionary.keywords.get(word) {
            return SingleWordOutcome::Score(score, format!("exact keyword match: {word}"));
        }

        let mut matched: Vec<(&str, i64)> = self
            .dictionary
            .keywords
            .iter()
            .filter(|(k, _)| word.contains(k.as_str()))
            .map(|(k, &v)| (k.as_str(), v))
            .collect();
        if matched.is_empty() {
            return SingleWordOutcome::None;
        }
        matched.sort_by_key(|(k, _)| *k);

        let matched_len: usize = matched.iter().map(|(k, _)| k.len()).sum();
        if matched_len == word.len() {
            let total: i64 = matched.iter().map(|(_, s)| *s).sum();
            let names: Vec<&str> = matched.iter().map(|(k, _)| *k).collect();
            SingleWordOutcome::Score(total, format!("exact match: {}", names.join(", ")))
        } else {
            SingleWordOutcome::Score(NORMAL, "text search found some keywords".to_string())
        }
    }
}

enum SingleWordOutcome {
    None,
    Disqualify(String),
    Score(i64, String),
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaVisitor for KeywordScorer {
    fn visit_column(&mut self, node: &GraphNode, _ctx: &VisitContext) -> Result<NavDirective, VisitorError> {
        let NodeRecord::Column(row) = &node.record else { return Ok(None) };
        let words = identifier_to_lc_words(&row.column_name);

        if words.len() > 1 {
            let (disqualify_reason, score) = self.score_multi_word(&words);
            if let Some(reason) = disqualify_reason {
                self.fact.add(disqualify(&node.id, reason));
            }
            if let Some((value, reason)) = score {
                self.fact.add(NodeScore::new(&node.id, value, reason));
            }
        } else if let Some(word) = words.first() {
            match self.score_single_word(word) {
                SingleWordOutcome::None => {}
                SingleWordOutcome::Disqualify(reason) => self.fact.add(disqualify(&node.id, reason)),
                SingleWordOutcome::Score(value, reason) => self.fact.add(NodeScore::new(&node.id, value, reason)),
            }
        }

        Ok(None)
    }
}

impl ColumnScorer for KeywordScorer {
    fn name(&self) -> &str {
        "keyword"
    }

    fn fact(&self) -> ScoringObjective {
        self.fact.clone()
    }

    fn dim(&self) -> ScoringObjective {
        self.dim.clone()
    }

    fn accept(&mut self, graph: &SchemaGraph) -> Result<(), VisitorError> {
        graph.accept_visitor(self)
    }
}
