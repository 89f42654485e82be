use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Classifying,
    Confirmed,
    Discarded,
    Skipped,
}

impl ReviewStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ReviewStatus::Confirmed | ReviewStatus::Discarded)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Classifying => "classifying",
            ReviewStatus::Confirmed => "confirmed",
            ReviewStatus::Discarded => "discarded",
            ReviewStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

// ── Valid transitions ──

const VALID_TRANSITIONS: &[(ReviewStatus, &[ReviewStatus])] = &[
    (
        ReviewStatus::Pending,
        &[
            ReviewStatus::Classifying,
            ReviewStatus::Discarded,
            ReviewStatus::Skipped,
        ],
    ),
    (
        ReviewStatus::Classifying,
        &[ReviewStatus::Confirmed, ReviewStatus::Pending], // confirm or cancel
    ),
    (ReviewStatus::Skipped, &[ReviewStatus::Pending]), // next session
                                                       // Confirmed and Discarded are terminal
];

pub fn is_valid_transition(from: ReviewStatus, to: ReviewStatus) -> bool {
    VALID_TRANSITIONS
        .iter()
        .any(|(f, targets)| *f == from && targets.contains(&to))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ReviewStatus; 5] = [
        ReviewStatus::Pending,
        ReviewStatus::Classifying,
        ReviewStatus::Confirmed,
        ReviewStatus::Discarded,
        ReviewStatus::Skipped,
    ];

    #[test]
    fn pending_fans_out() {
        assert!(is_valid_transition(ReviewStatus::Pending, ReviewStatus::Classifying));
        assert!(is_valid_transition(ReviewStatus::Pending, ReviewStatus::Discarded));
        assert!(is_valid_transition(ReviewStatus::Pending, ReviewStatus::Skipped));
        assert!(!is_valid_transition(ReviewStatus::Pending, ReviewStatus::Confirmed));
    }

    #[test]
    fn classifying_confirms_or_cancels() {
        assert!(is_valid_transition(ReviewStatus::Classifying, ReviewStatus::Confirmed));
        assert!(is_valid_transition(ReviewStatus::Classifying, ReviewStatus::Pending));
        assert!(!is_valid_transition(ReviewStatus::Classifying, ReviewStatus::Discarded));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for from in [ReviewStatus::Confirmed, ReviewStatus::Discarded] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(!is_valid_transition(from, to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn skipped_only_returns_to_pending() {
        let exits: Vec<_> = ALL
            .into_iter()
            .filter(|to| is_valid_transition(ReviewStatus::Skipped, *to))
            .collect();
        assert_eq!(exits, vec![ReviewStatus::Pending]);
    }
}
