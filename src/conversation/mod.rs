//! Conversation state: identifiers, records, title rules and the bounded store.

pub mod errors;
pub mod ids;
pub mod store;
pub mod title;
pub mod types;

pub use errors::{StoreError, StoreResult};
pub use ids::{ConversationId, RequestId};
pub use store::{ConversationStore, DeleteOutcome};
pub use types::{ChatMessage, Conversation, Sender, TitleSource};
