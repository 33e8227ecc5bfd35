use serde::{Deserialize, Serialize};

/// One role/message pair as displayed on a shared conversation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub message: String,
    #[serde(default)]
    pub edited: bool,
}

impl ConversationTurn {
    /// A freshly extracted turn, never marked as edited.
    pub fn new(role: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            message: message.into(),
            edited: false,
        }
    }

    /// Build the replacement for this turn from user-supplied text.
    ///
    /// The result is flagged as edited when either field differs from `self`.
    pub fn revised(&self, role: impl Into<String>, message: impl Into<String>) -> Self {
        let role = role.into();
        let message = message.into();
        let edited = role != self.role || message != self.message;
        Self {
            role,
            message,
            edited,
        }
    }
}
