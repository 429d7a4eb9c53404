// src/scorer.rs

use std::collections::HashSet;

/// Outcome of scoring one assistant reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreResult {
    pub score_change: i32,
    pub feedback: String,
}

/// Judges an assistant reply against the user message that prompted it.
/// Implementations must be pure: no side effects, no network access. The
/// session calls this exactly once per successful reply.
pub trait ResponseScorer {
    fn score(&self, user_content: &str, assistant_content: &str) -> ScoreResult;
}

/// Default word-overlap heuristic. Rewards replies that engage with the
/// question's vocabulary, penalizes empty or one-line brush-offs.
#[derive(Debug, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    fn significant_words(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 3)
            .map(|w| w.to_lowercase())
            .collect()
    }
}

impl ResponseScorer for HeuristicScorer {
    fn score(&self, user_content: &str, assistant_content: &str) -> ScoreResult {
        let reply = assistant_content.trim();
        if reply.is_empty() {
            return ScoreResult {
                score_change: -10,
                feedback: "The response was empty.".to_string(),
            };
        }
        if reply.len() < 20 {
            return ScoreResult {
                score_change: -5,
                feedback: "The response was too brief to be helpful.".to_string(),
            };
        }

        let asked = Self::significant_words(user_content);
        let answered = Self::significant_words(reply);
        let overlap = asked.intersection(&answered).count();

        if !asked.is_empty() && overlap == 0 {
            ScoreResult {
                score_change: -3,
                feedback: "The response did not engage with the question.".to_string(),
            }
        } else if overlap >= 3 {
            ScoreResult {
                score_change: 10,
                feedback: "The response addressed the question directly.".to_string(),
            }
        } else {
            ScoreResult {
                score_change: 5,
                feedback: "The response was helpful and relevant.".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reply_scores_negative() {
        let result = HeuristicScorer.score("What is Rust?", "   ");
        assert_eq!(result.score_change, -10);
    }

    #[test]
    fn test_brief_reply_scores_negative() {
        let result = HeuristicScorer.score("What is Rust?", "Yes.");
        assert_eq!(result.score_change, -5);
    }

    #[test]
    fn test_engaged_reply_scores_positive() {
        let result = HeuristicScorer.score(
            "Explain ownership and borrowing in Rust",
            "Ownership in Rust means each value has one owner; borrowing lets \
             other code reference it without taking ownership.",
        );
        assert_eq!(result.score_change, 10);
        assert!(!result.feedback.is_empty());
    }

    #[test]
    fn test_unrelated_reply_scores_negative() {
        let result = HeuristicScorer.score(
            "Explain ownership semantics please",
            "Bananas ripen faster inside closed paper bags, interestingly.",
        );
        assert_eq!(result.score_change, -3);
    }
}
