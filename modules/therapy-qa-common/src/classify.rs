// Keyword classifiers. All tables are immutable statics; callers pass a
// `&Taxonomy` so tests can swap in their own.

use crate::text::word_count;
use crate::types::ComplexityLevel;

/// An ordered rule: if `keyword` occurs (case-insensitive) the rule yields `label`.
pub type KeywordRule = (&'static str, &'static str);

/// A named topic with the keywords that mark it.
pub type CategoryRule = (&'static str, &'static [&'static str]);

/// Word-count ceilings (exclusive) for one complexity tier:
/// (question words, answer words, tier).
pub type ComplexityRule = (usize, usize, ComplexityLevel);

/// Every keyword table the classifiers consult.
#[derive(Debug, Clone, Copy)]
pub struct Taxonomy {
    /// Checked in order; first match wins.
    pub modalities: &'static [KeywordRule],
    pub modality_fallback: &'static str,
    /// Checked in order; first match wins.
    pub modality_tags: &'static [KeywordRule],
    pub modality_tag_fallback: &'static str,
    /// Checked in ascending order; first tier whose ceilings both hold wins.
    pub complexity: &'static [ComplexityRule],
    pub complexity_fallback: ComplexityLevel,
    /// Output order of `categorize` follows this table.
    pub categories: &'static [CategoryRule],
}

pub static DEFAULT_TAXONOMY: Taxonomy = Taxonomy {
    modalities: &[("cbt", "CBT"), ("dbt", "DBT")],
    modality_fallback: "Unknown",
    modality_tags: &[("parts", "Parts Work")],
    modality_tag_fallback: "None",
    complexity: &[
        (30, 100, ComplexityLevel::Low),
        (50, 200, ComplexityLevel::Medium),
    ],
    complexity_fallback: ComplexityLevel::High,
    categories: &[
        ("anxiety", &["anxiety", "panic", "stress", "worry", "anxious"]),
        ("depression", &["depression", "depressed", "mood", "sad", "hopeless"]),
        ("trauma", &["trauma", "ptsd", "abuse", "traumatic"]),
        ("relationships", &["relationship", "marriage", "partner", "family", "couple"]),
        ("therapy_types", &["cbt", "dbt", "emdr", "psychodynamic", "behavioral"]),
    ],
};

impl Taxonomy {
    /// Therapeutic modality mentioned in either text, by rule priority.
    pub fn modality(&self, question: &str, answer: &str) -> &'static str {
        first_match(self.modalities, question, answer).unwrap_or(self.modality_fallback)
    }

    /// Technique-specific tag mentioned in either text, by rule priority.
    pub fn modality_tag(&self, question: &str, answer: &str) -> &'static str {
        first_match(self.modality_tags, question, answer).unwrap_or(self.modality_tag_fallback)
    }

    pub fn complexity(&self, question: &str, answer: &str) -> ComplexityLevel {
        let q_words = word_count(question);
        let a_words = word_count(answer);
        self.complexity
            .iter()
            .find(|(q_max, a_max, _)| q_words < *q_max && a_words < *a_max)
            .map(|(_, _, level)| *level)
            .unwrap_or(self.complexity_fallback)
    }

    /// Every topic category whose keywords appear in `text`, in table order.
    pub fn categorize(&self, text: &str) -> Vec<&'static str> {
        let lower = text.to_lowercase();
        self.categories
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(name, _)| *name)
            .collect()
    }
}

fn first_match(rules: &[KeywordRule], question: &str, answer: &str) -> Option<&'static str> {
    let question = question.to_lowercase();
    let answer = answer.to_lowercase();
    rules
        .iter()
        .find(|(keyword, _)| question.contains(keyword) || answer.contains(keyword))
        .map(|(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn modality_defaults_to_unknown() {
        assert_eq!(DEFAULT_TAXONOMY.modality("talk therapy", "weekly sessions"), "Unknown");
    }

    #[test]
    fn modality_is_case_insensitive() {
        assert_eq!(DEFAULT_TAXONOMY.modality("Is DBT worth it", ""), "DBT");
        assert_eq!(DEFAULT_TAXONOMY.modality("", "my Cbt workbook"), "CBT");
    }

    #[test]
    fn cbt_takes_priority_over_dbt() {
        assert_eq!(DEFAULT_TAXONOMY.modality("dbt skills", "also cbt"), "CBT");
        assert_eq!(DEFAULT_TAXONOMY.modality("cbt and dbt", ""), "CBT");
    }

    #[test]
    fn custom_rule_order_changes_winner() {
        let taxonomy = Taxonomy {
            modalities: &[("dbt", "DBT"), ("cbt", "CBT")],
            ..DEFAULT_TAXONOMY
        };
        assert_eq!(taxonomy.modality("cbt and dbt", ""), "DBT");
    }

    #[test]
    fn modality_tag_detects_parts_work() {
        assert_eq!(DEFAULT_TAXONOMY.modality_tag("IFS and my PARTS", ""), "Parts Work");
        assert_eq!(DEFAULT_TAXONOMY.modality_tag("nothing here", "either"), "None");
    }

    #[test]
    fn complexity_low_boundary_is_exclusive() {
        assert_eq!(DEFAULT_TAXONOMY.complexity(&words(29), &words(99)), ComplexityLevel::Low);
        assert_eq!(DEFAULT_TAXONOMY.complexity(&words(30), &words(100)), ComplexityLevel::Medium);
    }

    #[test]
    fn complexity_requires_both_under_ceiling() {
        assert_eq!(DEFAULT_TAXONOMY.complexity(&words(5), &words(150)), ComplexityLevel::Medium);
        assert_eq!(DEFAULT_TAXONOMY.complexity(&words(49), &words(199)), ComplexityLevel::Medium);
        assert_eq!(DEFAULT_TAXONOMY.complexity(&words(50), &words(10)), ComplexityLevel::High);
        assert_eq!(DEFAULT_TAXONOMY.complexity(&words(10), &words(200)), ComplexityLevel::High);
    }

    #[test]
    fn categorize_preserves_table_order_without_duplicates() {
        let text = "Panic attacks and PTSD; my partner says stress and anxiety are linked. CBT helped.";
        assert_eq!(
            DEFAULT_TAXONOMY.categorize(text),
            vec!["anxiety", "trauma", "relationships", "therapy_types"]
        );
    }

    #[test]
    fn categorize_empty_when_nothing_matches() {
        assert!(DEFAULT_TAXONOMY.categorize("the weather is nice").is_empty());
    }
}
