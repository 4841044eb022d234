//! Keyword-driven drug recommendation.
//!
//! Maps free-text diagnosis to a drug name by case-insensitive substring
//! checks against an ordered rule table. The first rule with any matching
//! keyword wins; text matching nothing gets the default drug.

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::Drug;

/// Drug suggested when no rule matches.
pub const DEFAULT_DRUG: &str = "Penicillin";

/// Recommendation errors.
#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Diagnosis text is empty")]
    EmptyDiagnosis,
}

pub type RecommendResult<T> = Result<T, RecommendError>;

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule {
    /// Lowercase keywords, any of which triggers the rule
    pub keywords: Vec<String>,
    /// Drug name to recommend
    pub drug_name: String,
}

impl KeywordRule {
    pub fn new(keywords: &[&str], drug_name: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            drug_name: drug_name.to_string(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Ordered rule table plus a fallback.
#[derive(Debug, Clone)]
pub struct Recommender {
    rules: Vec<KeywordRule>,
    default_drug: String,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new()
    }
}

impl Recommender {
    /// Recommender with the standard rule table.
    pub fn new() -> Self {
        Self {
            rules: Self::default_rules(),
            default_drug: DEFAULT_DRUG.to_string(),
        }
    }

    /// Suggest a drug name for the diagnosis.
    pub fn recommend(&self, diagnosis: &str) -> &str {
        let lowered = diagnosis.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.drug_name.as_str())
            .unwrap_or(self.default_drug.as_str())
    }

    /// Append a rule after the existing ones.
    pub fn add_rule(&mut self, keywords: &[&str], drug_name: &str) {
        self.rules.push(KeywordRule::new(keywords, drug_name));
    }

    /// Replace the fallback drug.
    pub fn set_default(&mut self, drug_name: &str) {
        self.default_drug = drug_name.to_string();
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    fn default_rules() -> Vec<KeywordRule> {
        vec![
            KeywordRule::new(&["mastitis", "udder"], "Penicillin"),
            KeywordRule::new(&["respiratory", "cough", "breathing"], "Tylosin"),
            KeywordRule::new(&["infection", "fever"], "Oxytetracycline"),
        ]
    }
}

/// Suggest a drug name using the standard rule table.
pub fn recommend_drug(diagnosis: &str) -> String {
    Recommender::new().recommend(diagnosis).to_string()
}

impl Database {
    /// Resolve the recommendation for `diagnosis` to a stored drug.
    ///
    /// `None` when the suggested drug is not in the catalog.
    pub fn recommend_for_diagnosis(
        &self,
        recommender: &Recommender,
        diagnosis: &str,
    ) -> RecommendResult<Option<Drug>> {
        if diagnosis.trim().is_empty() {
            return Err(RecommendError::EmptyDiagnosis);
        }
        let name = recommender.recommend(diagnosis);
        let drug = self.find_drug_by_name(name)?;
        tracing::debug!(drug = name, found = drug.is_some(), "Drug recommendation");
        Ok(drug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mastitis_rule_any_case() {
        assert_eq!(recommend_drug("mastitis in udder"), "Penicillin");
        assert_eq!(recommend_drug("MASTITIS"), "Penicillin");
        assert_eq!(recommend_drug("Swollen Udder"), "Penicillin");
    }

    #[test]
    fn test_respiratory_rule() {
        assert_eq!(recommend_drug("Respiratory infection"), "Tylosin");
        assert_eq!(recommend_drug("persistent cough"), "Tylosin");
        assert_eq!(recommend_drug("labored breathing"), "Tylosin");
    }

    #[test]
    fn test_infection_rule() {
        assert_eq!(recommend_drug("hoof infection"), "Oxytetracycline");
        assert_eq!(recommend_drug("high fever"), "Oxytetracycline");
    }

    #[test]
    fn test_first_rule_wins() {
        // Matches both the udder rule and the infection rule
        assert_eq!(recommend_drug("udder infection"), "Penicillin");
        // Matches both the respiratory rule and the fever rule
        assert_eq!(recommend_drug("fever and cough"), "Tylosin");
    }

    #[test]
    fn test_default() {
        assert_eq!(recommend_drug("unrelated text"), DEFAULT_DRUG);
        assert_eq!(recommend_drug(""), DEFAULT_DRUG);
    }

    #[test]
    fn test_custom_rules_follow_defaults() {
        let mut recommender = Recommender::new();
        recommender.add_rule(&["Lameness"], "Ceftiofur");
        recommender.set_default("Meloxicam");

        assert_eq!(recommender.recommend("lameness in hind leg"), "Ceftiofur");
        assert_eq!(recommender.recommend("lameness with fever"), "Oxytetracycline");
        assert_eq!(recommender.recommend("nothing"), "Meloxicam");
        assert_eq!(recommender.rules().len(), 4);
    }

    #[test]
    fn test_resolve_against_store() {
        let db = Database::open_in_memory().unwrap();
        db.seed_demo().unwrap();
        let recommender = Recommender::new();

        let drug = db
            .recommend_for_diagnosis(&recommender, "Coughing badly")
            .unwrap()
            .unwrap();
        assert_eq!(drug.name, "Tylosin");
        assert_eq!(drug.id, "2");

        assert!(matches!(
            db.recommend_for_diagnosis(&recommender, "   "),
            Err(RecommendError::EmptyDiagnosis)
        ));
    }

    #[test]
    fn test_resolve_missing_drug() {
        let db = Database::open_in_memory().unwrap();
        let drug = db
            .recommend_for_diagnosis(&Recommender::new(), "mastitis")
            .unwrap();
        assert!(drug.is_none());
    }
}
