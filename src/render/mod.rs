//! Projection of store state onto the screen.
//!
//! Rendering is a full rebuild: [`project`] turns the store into a
//! [`StoreView`] snapshot and a [`Renderer`] draws it from scratch.

pub mod terminal;

pub use terminal::TerminalRenderer;

use serde::Serialize;

use crate::conversation::{ChatMessage, ConversationId, ConversationStore};

/// History icon for conversations with an attached CSV.
pub const CSV_ICON: &str = "📊";
/// History icon for plain conversations.
pub const CHAT_ICON: &str = "💬";

/// One row of the history list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Conversation identifier.
    pub id: ConversationId,
    /// Display title.
    pub title: String,
    /// [`CSV_ICON`] or [`CHAT_ICON`].
    pub icon: &'static str,
    /// Whether this is the active conversation.
    pub active: bool,
}

/// Content of the message pane.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "messages", rename_all = "snake_case")]
pub enum MessagePane {
    /// Active conversation has no messages yet.
    Welcome,
    /// Messages of the active conversation, in order.
    Messages(Vec<ChatMessage>),
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StoreView {
    /// History list, most recent first.
    pub history: Vec<HistoryEntry>,
    /// Title of the active conversation.
    pub active_title: String,
    /// Message pane of the active conversation.
    pub pane: MessagePane,
}

/// Build a snapshot of the store for rendering.
#[must_use]
pub fn project(store: &ConversationStore) -> StoreView {
    let active_id = store.active_id();
    let history = store
        .conversations()
        .map(|c| HistoryEntry {
            id: c.id,
            title: c.title.clone(),
            icon: if c.has_csv() { CSV_ICON } else { CHAT_ICON },
            active: c.id == active_id,
        })
        .collect();

    let (active_title, pane) = match store.get_active() {
        Ok(active) if active.messages.is_empty() => (active.title.clone(), MessagePane::Welcome),
        Ok(active) => (
            active.title.clone(),
            MessagePane::Messages(active.messages.clone()),
        ),
        Err(err) => {
            tracing::error!(%err, "active conversation missing while rendering");
            (String::new(), MessagePane::Welcome)
        }
    };

    StoreView {
        history,
        active_title,
        pane,
    }
}

/// Draws store snapshots and user notices.
pub trait Renderer {
    /// Redraw the history list and message pane.
    fn render(&mut self, view: &StoreView);

    /// Show a blocking notice (e.g. a rejected delete).
    fn notify(&mut self, notice: &str);
}
