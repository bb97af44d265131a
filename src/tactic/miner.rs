//! Keyword frequency mining.
//!
//! The miner counts whitespace tokens across a set of normalized documents and
//! returns the most frequent candidates for a tactic's dictionary. In seed
//! context mode only documents that already contain a seed term are counted,
//! and the seed terms themselves are left out of the result.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeSet;
//!
//! use tactician::tactic::miner::{KeywordMiner, MiningOptions};
//!
//! let miner = KeywordMiner::new(MiningOptions::default().with_frequency_floor(None));
//! let seeds: BTreeSet<String> = ["sale".to_string()].into_iter().collect();
//! let docs = ["big sale today", "sale ends today", "nothing to see"];
//!
//! let table = miner.mine(&docs, &seeds).unwrap();
//! assert_eq!(table.terms(), vec!["today", "big", "ends"]);
//! assert_eq!(table.get("today"), Some(2));
//! ```

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// One mined term and its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFrequency {
    pub term: String,
    pub count: usize,
}

/// Terms ordered by descending count; ties keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermFrequencyTable {
    entries: Vec<TermFrequency>,
}

impl TermFrequencyTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rank counted terms. `counts` must iterate in first-seen order.
    fn ranked(counts: IndexMap<String, usize>, floor: Option<usize>, top_k: usize) -> Self {
        let mut entries: Vec<TermFrequency> = counts
            .into_iter()
            .filter(|(_, count)| floor.is_none_or(|floor| *count > floor))
            .map(|(term, count)| TermFrequency { term, count })
            .collect();

        // sort_by is stable, so equal counts stay in first-seen order
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(top_k);

        TermFrequencyTable { entries }
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table has no terms.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &TermFrequency> {
        self.entries.iter()
    }

    /// Terms in rank order.
    pub fn terms(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.term.as_str()).collect()
    }

    /// Count for a term, if it was kept.
    pub fn get(&self, term: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.term == term).map(|e| e.count)
    }
}

/// Variation points of the mining stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningOptions {
    /// Drop stop words before counting.
    pub use_stopwords: bool,
    /// Custom stop word list; `None` uses the default English list.
    pub stopwords: Option<Vec<String>>,
    /// Count only documents containing a seed term, and skip the seed terms.
    pub restrict_to_seed_matches: bool,
    /// Keep only terms whose count is strictly greater than this.
    pub frequency_floor: Option<usize>,
    /// Maximum number of terms returned.
    pub top_k: usize,
}

impl Default for MiningOptions {
    fn default() -> Self {
        MiningOptions {
            use_stopwords: true,
            stopwords: None,
            restrict_to_seed_matches: true,
            frequency_floor: Some(1),
            top_k: 20,
        }
    }
}

impl MiningOptions {
    pub fn with_stopwords(mut self, use_stopwords: bool) -> Self {
        self.use_stopwords = use_stopwords;
        self
    }

    pub fn with_restrict_to_seed_matches(mut self, restrict: bool) -> Self {
        self.restrict_to_seed_matches = restrict;
        self
    }

    pub fn with_frequency_floor(mut self, floor: Option<usize>) -> Self {
        self.frequency_floor = floor;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// Counts candidate keywords over normalized documents.
#[derive(Debug, Clone)]
pub struct KeywordMiner {
    options: MiningOptions,
    tokenizer: WhitespaceTokenizer,
    stop_filter: Option<StopFilter>,
}

impl KeywordMiner {
    /// Create a miner for the given options.
    pub fn new(options: MiningOptions) -> Self {
        let stop_filter = options.use_stopwords.then(|| match &options.stopwords {
            Some(words) => StopFilter::from_words(words.iter().map(|w| w.to_lowercase())),
            None => StopFilter::new(),
        });

        KeywordMiner {
            options,
            tokenizer: WhitespaceTokenizer::new(),
            stop_filter,
        }
    }

    /// The options this miner was built with.
    pub fn options(&self) -> &MiningOptions {
        &self.options
    }

    /// Mine term frequencies from `documents`.
    ///
    /// When restricting to seed matches and no document contains a seed term,
    /// the result is empty: the caller falls back to the seed terms alone.
    pub fn mine<S: AsRef<str>>(
        &self,
        documents: &[S],
        seed_terms: &BTreeSet<String>,
    ) -> Result<TermFrequencyTable> {
        let positive: Vec<&str> = if self.options.restrict_to_seed_matches {
            let mut matched = Vec::new();
            for document in documents {
                if self.contains_seed(document.as_ref(), seed_terms)? {
                    matched.push(document.as_ref());
                }
            }
            matched
        } else {
            documents.iter().map(AsRef::as_ref).collect()
        };

        log::debug!(
            "mining {} of {} documents (restrict_to_seed_matches={})",
            positive.len(),
            documents.len(),
            self.options.restrict_to_seed_matches
        );

        if self.options.restrict_to_seed_matches && positive.is_empty() {
            return Ok(TermFrequencyTable::empty());
        }

        let analyzer = self.analyzer(seed_terms);
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for document in positive {
            for term in analyzer.terms(document)? {
                *counts.entry(term).or_insert(0) += 1;
            }
        }

        Ok(TermFrequencyTable::ranked(
            counts,
            self.options.frequency_floor,
            self.options.top_k,
        ))
    }

    fn contains_seed(&self, document: &str, seed_terms: &BTreeSet<String>) -> Result<bool> {
        Ok(self
            .tokenizer
            .tokenize(document)?
            .any(|token| seed_terms.contains(&token.text)))
    }

    fn analyzer(&self, seed_terms: &BTreeSet<String>) -> PipelineAnalyzer {
        let mut analyzer =
            PipelineAnalyzer::new(Arc::new(self.tokenizer.clone())).with_name("keyword_miner");

        if let Some(stop_filter) = &self.stop_filter {
            analyzer = analyzer.add_filter(Arc::new(stop_filter.clone()));
        }

        if self.options.restrict_to_seed_matches {
            let seeds: HashSet<String> = seed_terms.iter().cloned().collect();
            analyzer =
                analyzer.add_filter(Arc::new(StopFilter::with_stop_words(seeds).with_name("seed_terms")));
        }

        analyzer
    }
}
