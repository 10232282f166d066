/// Minimum title length (characters) for a post to count as a question.
pub const MIN_TITLE_CHARS: usize = 20;

/// Minimum answer length (characters).
pub const MIN_ANSWER_CHARS: usize = 50;

/// Placeholders Reddit leaves behind when content is taken down.
pub const REMOVAL_MARKERS: &[&str] = &["[removed]", "[deleted]"];

/// Case-insensitive substrings that mark a title as a question.
pub const QUESTION_INDICATORS: &[&str] = &[
    "?", "how", "what", "why", "can", "should", "help", "advice",
];

/// Whether a post title, its body and a candidate answer form an admissible
/// question/answer pair. All three guards must pass:
/// title and answer are long enough, neither body nor answer was removed, and
/// the title reads like a question.
pub fn is_valid_qa(title: &str, selftext: &str, comment_body: &str) -> bool {
    if title.chars().count() < MIN_TITLE_CHARS || comment_body.chars().count() < MIN_ANSWER_CHARS {
        return false;
    }

    if is_removed(selftext) || is_removed(comment_body) {
        return false;
    }

    has_question_indicator(title)
}

/// Content carries a removal/deletion placeholder.
pub fn is_removed(text: &str) -> bool {
    REMOVAL_MARKERS.iter().any(|marker| text.contains(marker))
}

pub fn has_question_indicator(title: &str) -> bool {
    let lower = title.to_lowercase();
    QUESTION_INDICATORS.iter().any(|ind| lower.contains(ind))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_ANSWER: &str =
        "Honestly it helped me to write things down before each session and bring the list.";

    #[test]
    fn title_of_19_chars_is_rejected() {
        let title = "Feeling tired today";
        assert_eq!(title.chars().count(), 19);
        assert!(!is_valid_qa(title, "", GOOD_ANSWER));
        assert!(!is_valid_qa(title, "How should I cope? Any advice?", GOOD_ANSWER));
    }

    #[test]
    fn title_without_indicator_is_rejected() {
        let title = "Feeling tired lately";
        assert_eq!(title.chars().count(), 20);
        assert!(!is_valid_qa(title, "", GOOD_ANSWER));
    }

    #[test]
    fn question_title_with_long_answer_is_accepted() {
        assert!(is_valid_qa(
            "How are you feeling today about this situation",
            "",
            GOOD_ANSWER
        ));
    }

    #[test]
    fn indicator_match_is_case_insensitive() {
        assert!(is_valid_qa("WHY is therapy so expensive here", "", GOOD_ANSWER));
        assert!(is_valid_qa("Therapist ghosted me after intake?", "", GOOD_ANSWER));
    }

    #[test]
    fn short_answer_is_rejected() {
        let answer = "x".repeat(49);
        assert!(!is_valid_qa("How do I find a good therapist", "", &answer));
        let answer = "x".repeat(50);
        assert!(is_valid_qa("How do I find a good therapist", "", &answer));
    }

    #[test]
    fn answer_length_counts_characters_not_bytes() {
        // 25 two-byte characters: 50 bytes but only 25 chars
        let answer = "é".repeat(25);
        assert!(!is_valid_qa("How do I find a good therapist", "", &answer));
    }

    #[test]
    fn removed_body_or_answer_is_rejected() {
        let title = "How do I find a good therapist";
        assert!(!is_valid_qa(title, "[removed]", GOOD_ANSWER));
        assert!(!is_valid_qa(title, "", &format!("{GOOD_ANSWER} [deleted]")));
    }
}
