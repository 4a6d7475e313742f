//! Keyword grading for quiz answers.
//!
//! Two grading contracts exist, one per input modality:
//!
//! - keyboard input is field-scoped, so each keyword blank is checked by
//!   exact (normalized) equality;
//! - voice input is one continuous transcript, so each keyword is checked by
//!   substring containment, tolerating the surrounding words of natural
//!   speech.
//!
//! None of these functions error or panic. Absent input and empty keyword
//! lists degrade to a negative/zero result, so calling UI code never wraps
//! grading in error handling.

use std::collections::HashMap;

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Map key under which the UI stores the input field for a keyword.
#[must_use]
pub fn keyword_key(keyword: &str) -> String {
    keyword.to_lowercase()
}

/// Per-field check used for immediate feedback while typing.
///
/// Case-insensitive, whitespace-trimmed exact equality; no fuzzy matching.
#[must_use]
pub fn validate_keyword_realtime(user_input: &str, keyword: &str) -> bool {
    normalize(user_input) == normalize(keyword)
}

//
// ─── RESULT TYPES ──────────────────────────────────────────────────────────────
//

/// Counts shared by both grading modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingSummary {
    pub correct_count: usize,
    pub total_count: usize,
    /// `round(correct / total * 100)`; 0 when there are no keywords.
    pub percentage: u8,
    pub is_all_correct: bool,
}

impl GradingSummary {
    fn from_counts(correct: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            // total <= a keyword list's length, so the ratio fits u8 after
            // rounding to 0..=100.
            (correct as f64 / total as f64 * 100.0).round() as u8
        };
        Self {
            correct_count: correct,
            total_count: total,
            // An answerless question must not auto-pass: empty keyword lists
            // grade as a failure, not a vacuous success.
            is_all_correct: total > 0 && correct == total,
            percentage,
        }
    }
}

/// Feedback for one keyword blank after keyboard grading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordDetail {
    pub keyword: String,
    pub user_input: String,
    pub is_correct: bool,
}

/// Submit-time result for keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardGrading {
    pub summary: GradingSummary,
    /// One entry per required keyword, in keyword order.
    pub details: Vec<KeywordDetail>,
}

/// Submit-time result for a voice transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceGrading {
    pub summary: GradingSummary,
    pub matched_keywords: Vec<String>,
    pub missed_keywords: Vec<String>,
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Grade a full keyboard answer against the required keywords.
///
/// Each keyword's input is looked up under its lower-cased key (see
/// [`keyword_key`]); a missing entry grades the same as an empty one.
#[must_use]
pub fn grade_keyboard_answer(
    keyword_inputs: &HashMap<String, String>,
    keywords: &[String],
) -> KeyboardGrading {
    let mut details = Vec::with_capacity(keywords.len());
    let mut correct = 0;

    for keyword in keywords {
        let user_input = keyword_inputs
            .get(&keyword_key(keyword))
            .map(String::as_str)
            .unwrap_or_default();
        let is_correct = validate_keyword_realtime(user_input, keyword);
        if is_correct {
            correct += 1;
        }
        details.push(KeywordDetail {
            keyword: keyword.clone(),
            user_input: user_input.to_owned(),
            is_correct,
        });
    }

    KeyboardGrading {
        summary: GradingSummary::from_counts(correct, keywords.len()),
        details,
    }
}

/// Grade a voice transcript against the required keywords.
///
/// Containment, not equality: the transcript carries words around each
/// keyword. A keyword that is a substring of a longer word also matches
/// ("her" inside "there"); grading stays lenient on that.
#[must_use]
pub fn grade_voice_answer(user_answer: &str, keywords: &[String]) -> VoiceGrading {
    let transcript = normalize(user_answer);
    let mut matched = Vec::new();
    let mut missed = Vec::new();

    for keyword in keywords {
        if transcript.contains(&normalize(keyword)) {
            matched.push(keyword.clone());
        } else {
            missed.push(keyword.clone());
        }
    }

    VoiceGrading {
        summary: GradingSummary::from_counts(matched.len(), keywords.len()),
        matched_keywords: matched,
        missed_keywords: missed,
    }
}

//
// ─── FIELD-STATE HELPERS ───────────────────────────────────────────────────────
//

/// True iff every keyword has a non-empty entry. Presence only, not
/// correctness; gates the submit affordance in keyboard mode.
#[must_use]
pub fn are_all_keywords_filled(
    keyword_inputs: &HashMap<String, String>,
    keywords: &[String],
) -> bool {
    keywords.iter().all(|keyword| {
        keyword_inputs
            .get(&keyword_key(keyword))
            .is_some_and(|input| !input.trim().is_empty())
    })
}

/// True iff every keyword's entry passes the realtime check. Drives the
/// automatic solving → grading transition in keyboard mode.
#[must_use]
pub fn are_all_keywords_correct(
    keyword_inputs: &HashMap<String, String>,
    keywords: &[String],
) -> bool {
    keywords.iter().all(|keyword| {
        keyword_inputs
            .get(&keyword_key(keyword))
            .is_some_and(|input| validate_keyword_realtime(input, keyword))
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| (*word).to_string()).collect()
    }

    fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn realtime_check_is_normalized_equality() {
        assert!(validate_keyword_realtime("Interview", "interview"));
        assert!(validate_keyword_realtime("  interview  ", "interview"));
        assert!(validate_keyword_realtime("INTERVIEW", "Interview"));
        assert!(!validate_keyword_realtime("intervew", "interview"));
        assert!(!validate_keyword_realtime("", "interview"));
    }

    #[test]
    fn realtime_check_rejects_partial_input() {
        // Exact match per blank: keyboard mode gets no substring leniency.
        assert!(!validate_keyword_realtime("inter", "interview"));
        assert!(!validate_keyword_realtime("the interview", "interview"));
    }

    #[test]
    fn keyboard_full_correct_map_passes() {
        let keywords = keywords(&["point", "interview"]);
        let inputs = inputs(&[("point", "point"), ("interview", "interview")]);

        let result = grade_keyboard_answer(&inputs, &keywords);

        assert!(result.summary.is_all_correct);
        assert_eq!(result.summary.correct_count, 2);
        assert_eq!(result.summary.total_count, 2);
        assert_eq!(result.summary.percentage, 100);
    }

    #[test]
    fn keyboard_typo_scores_partial() {
        let keywords = keywords(&["point", "interview"]);
        let inputs = inputs(&[("interview", "interview"), ("point", "pont")]);

        let result = grade_keyboard_answer(&inputs, &keywords);

        assert_eq!(result.summary.correct_count, 1);
        assert_eq!(result.summary.total_count, 2);
        assert!(!result.summary.is_all_correct);
        assert_eq!(result.summary.percentage, 50);

        let point = &result.details[0];
        assert_eq!(point.keyword, "point");
        assert_eq!(point.user_input, "pont");
        assert!(!point.is_correct);

        let interview = &result.details[1];
        assert_eq!(interview.keyword, "interview");
        assert!(interview.is_correct);
    }

    #[test]
    fn keyboard_inputs_are_keyed_by_lowercased_keyword() {
        let keywords = keywords(&["Interview"]);
        let inputs = inputs(&[("interview", "interview")]);

        let result = grade_keyboard_answer(&inputs, &keywords);
        assert!(result.summary.is_all_correct);
    }

    #[test]
    fn keyboard_missing_entry_grades_as_empty() {
        let keywords = keywords(&["point", "interview"]);
        let inputs = inputs(&[("interview", "interview")]);

        let result = grade_keyboard_answer(&inputs, &keywords);
        assert_eq!(result.summary.correct_count, 1);
        assert_eq!(result.details[0].user_input, "");
        assert!(!result.details[0].is_correct);
    }

    #[test]
    fn keyboard_empty_keywords_is_a_failure_state() {
        let result = grade_keyboard_answer(&inputs(&[("anything", "anything")]), &[]);

        assert!(!result.summary.is_all_correct);
        assert_eq!(result.summary.correct_count, 0);
        assert_eq!(result.summary.total_count, 0);
        assert_eq!(result.summary.percentage, 0);
        assert!(result.details.is_empty());
    }

    #[test]
    fn keyboard_percentage_rounds() {
        let keywords = keywords(&["one", "two", "three"]);

        let one_of_three = inputs(&[("one", "one")]);
        let result = grade_keyboard_answer(&one_of_three, &keywords);
        assert_eq!(result.summary.percentage, 33);

        let two_of_three = inputs(&[("one", "one"), ("two", "two")]);
        let result = grade_keyboard_answer(&two_of_three, &keywords);
        assert_eq!(result.summary.percentage, 67);
    }

    #[test]
    fn voice_transcript_with_all_keywords_passes() {
        let keywords = keywords(&["interview", "go"]);
        let result = grade_voice_answer("well how did the Interview go today", &keywords);

        assert!(result.summary.is_all_correct);
        assert_eq!(result.matched_keywords, vec!["interview", "go"]);
        assert!(result.missed_keywords.is_empty());
        assert_eq!(result.summary.percentage, 100);
    }

    #[test]
    fn voice_transcript_missing_a_keyword_fails() {
        let keywords = keywords(&["interview", "point"]);
        let result = grade_voice_answer("how did the interview go", &keywords);

        assert!(!result.summary.is_all_correct);
        assert_eq!(result.matched_keywords, vec!["interview"]);
        assert_eq!(result.missed_keywords, vec!["point"]);
        assert_eq!(result.summary.correct_count, 1);
        assert_eq!(result.summary.percentage, 50);
    }

    #[test]
    fn voice_containment_matches_inside_longer_words() {
        // Known tolerance gap, kept lenient: "her" matches inside "there".
        let keywords = keywords(&["her"]);
        let result = grade_voice_answer("there it is", &keywords);
        assert!(result.summary.is_all_correct);
    }

    #[test]
    fn voice_empty_transcript_fails_quietly() {
        let keywords = keywords(&["interview"]);
        let result = grade_voice_answer("", &keywords);

        assert!(!result.summary.is_all_correct);
        assert_eq!(result.missed_keywords, vec!["interview"]);
    }

    #[test]
    fn voice_empty_keywords_is_a_failure_state() {
        let result = grade_voice_answer("anything at all", &[]);

        assert!(!result.summary.is_all_correct);
        assert_eq!(result.summary.total_count, 0);
        assert_eq!(result.summary.percentage, 0);
    }

    #[test]
    fn filled_ignores_correctness() {
        let keywords = keywords(&["point", "interview"]);
        let wrong_but_filled = inputs(&[("point", "pont"), ("interview", "intervew")]);
        assert!(are_all_keywords_filled(&wrong_but_filled, &keywords));

        let partially_filled = inputs(&[("point", "pont"), ("interview", "   ")]);
        assert!(!are_all_keywords_filled(&partially_filled, &keywords));

        let missing_entry = inputs(&[("point", "pont")]);
        assert!(!are_all_keywords_filled(&missing_entry, &keywords));
    }

    #[test]
    fn all_correct_requires_every_field_to_validate() {
        let keywords = keywords(&["point", "interview"]);
        let all_right = inputs(&[("point", " Point "), ("interview", "INTERVIEW")]);
        assert!(are_all_keywords_correct(&all_right, &keywords));

        let one_typo = inputs(&[("point", "pont"), ("interview", "interview")]);
        assert!(!are_all_keywords_correct(&one_typo, &keywords));
    }

    #[test]
    fn empty_keyword_list_fills_vacuously_but_never_grades_correct() {
        // Presence checks are plain `all()`; the non-vacuous policy belongs
        // to grading alone.
        let inputs = inputs(&[]);
        assert!(are_all_keywords_filled(&inputs, &[]));
        assert!(are_all_keywords_correct(&inputs, &[]));
        assert!(!grade_keyboard_answer(&inputs, &[]).summary.is_all_correct);
    }
}
