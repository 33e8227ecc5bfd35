use serde::{Deserialize, Serialize};

use crate::domain::ConversationTurn;

/// An ordered sequence of turns, in display order.
///
/// Values are never edited in place: an edit produces a new `Conversation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new(turns: Vec<ConversationTurn>) -> Self {
        Self { turns }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Apply user edits against this (originally extracted) conversation.
    ///
    /// `edits[i]` replaces the role and message of turn `i`. Turns without a
    /// matching edit are carried over unchanged, and extra edits are ignored.
    pub fn with_edits<I, R, M>(&self, edits: I) -> Self
    where
        I: IntoIterator<Item = (R, M)>,
        R: Into<String>,
        M: Into<String>,
    {
        let mut edits = edits.into_iter();
        let turns = self
            .turns
            .iter()
            .map(|turn| match edits.next() {
                Some((role, message)) => turn.revised(role, message),
                None => turn.clone(),
            })
            .collect();
        Self { turns }
    }

    /// Whether any turn differs from the extraction.
    pub fn has_edits(&self) -> bool {
        self.turns.iter().any(|t| t.edited)
    }
}

impl From<Vec<ConversationTurn>> for Conversation {
    fn from(turns: Vec<ConversationTurn>) -> Self {
        Self::new(turns)
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a ConversationTurn;
    type IntoIter = std::slice::Iter<'a, ConversationTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Conversation {
        Conversation::new(vec![
            ConversationTurn::new("User", "Hi"),
            ConversationTurn::new("ChatGPT", "Hello there"),
        ])
    }

    #[test]
    fn test_with_edits_flags_only_changed_turns() {
        let original = sample();
        let edited = original.with_edits(vec![("User", "Hi"), ("ChatGPT", "Hello!")]);

        assert!(!edited.turns()[0].edited);
        assert!(edited.turns()[1].edited);
        assert_eq!(edited.turns()[1].message, "Hello!");
        assert!(edited.has_edits());
    }

    #[test]
    fn test_with_edits_leaves_original_untouched() {
        let original = sample();
        let _ = original.with_edits(vec![("Me", "Yo"), ("Bot", "Sup")]);
        assert_eq!(original, sample());
        assert!(!original.has_edits());
    }

    #[test]
    fn test_reverting_an_edit_clears_the_flag() {
        let original = sample();
        let once = original.with_edits(vec![("Me", "Hi")]);
        assert!(once.turns()[0].edited);

        let reverted = original.with_edits(vec![("User", "Hi")]);
        assert!(!reverted.turns()[0].edited);
    }

    #[test]
    fn test_short_edit_list_keeps_remaining_turns() {
        let original = sample();
        let edited = original.with_edits(vec![("Me", "Hi")]);
        assert_eq!(edited.len(), 2);
        assert_eq!(edited.turns()[1], original.turns()[1]);
    }

    #[test]
    fn test_json_is_a_plain_array() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.starts_with('['));
        let back: Conversation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
