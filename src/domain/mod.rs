pub mod conversation;
pub mod share_url;
pub mod turn;

pub use conversation::Conversation;
pub use share_url::ShareUrl;
pub use turn::ConversationTurn;
