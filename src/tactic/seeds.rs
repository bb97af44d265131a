//! Built-in tactics and their seed keyword lists.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A marketing tactic: a name plus the seed terms that bootstrap its dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tactic {
    /// Category name, e.g. `urgency_marketing`.
    pub name: String,
    /// Built-in keywords, lower-cased.
    pub seed_terms: BTreeSet<String>,
}

impl Tactic {
    /// Create a tactic; seed terms are trimmed and lower-cased.
    pub fn new<I, S>(name: &str, seed_terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Tactic {
            name: name.to_string(),
            seed_terms: seed_terms
                .into_iter()
                .map(|term| term.as_ref().trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect(),
        }
    }

    /// Name of the conventional ground-truth flag column for this tactic.
    pub fn flag_column(&self) -> String {
        flag_column(&self.name)
    }
}

/// `<tactic>_flag`.
pub fn flag_column(tactic: &str) -> String {
    format!("{tactic}_flag")
}

/// The three built-in tactics, in presentation order.
pub fn default_tactics() -> Vec<Tactic> {
    vec![
        Tactic::new(
            "urgency_marketing",
            ["now", "today", "limited", "hurry", "exclusive"],
        ),
        Tactic::new(
            "social_proof",
            ["bestseller", "popular", "trending", "recommended"],
        ),
        Tactic::new(
            "discount_marketing",
            ["sale", "discount", "deal", "free", "offer"],
        ),
    ]
}

/// Look up a built-in tactic by name.
pub fn find_tactic(name: &str) -> Option<Tactic> {
    default_tactics().into_iter().find(|tactic| tactic.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tactics_order() {
        let names: Vec<_> = default_tactics().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["urgency_marketing", "social_proof", "discount_marketing"]
        );
    }

    #[test]
    fn test_find_tactic() {
        let tactic = find_tactic("discount_marketing").unwrap();
        assert_eq!(tactic.seed_terms.len(), 5);
        assert!(tactic.seed_terms.contains("sale"));
        assert_eq!(tactic.flag_column(), "discount_marketing_flag");
        assert!(find_tactic("fear_of_missing_out").is_none());
    }

    #[test]
    fn test_seed_terms_are_normalized() {
        let tactic = Tactic::new("custom", [" Now ", "LIMITED", ""]);
        assert_eq!(
            tactic.seed_terms.into_iter().collect::<Vec<_>>(),
            vec!["limited", "now"]
        );
    }
}
