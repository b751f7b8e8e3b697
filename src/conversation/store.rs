//! In-memory conversation registry.
//!
//! Holds at most `capacity` conversations, most recent first, and the pointer
//! to the active one. The store is never empty and the active id always
//! resolves.

use std::collections::VecDeque;

use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::ids::ConversationId;
use super::title::{default_title, title_from_file_name, title_from_message};
use super::types::{ChatMessage, Conversation, Sender, TitleSource};

/// Result of a successful delete.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DeleteOutcome {
    /// The conversation that was removed.
    pub removed: ConversationId,
    /// Set when the removed conversation was active; the new active id.
    pub new_active: Option<ConversationId>,
}

impl DeleteOutcome {
    /// Whether the active conversation changed and the pane must be replayed.
    #[must_use]
    pub const fn active_changed(&self) -> bool {
        self.new_active.is_some()
    }
}

/// Ordered, bounded collection of conversations with an active selection.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    conversations: VecDeque<Conversation>,
    active: ConversationId,
    capacity: usize,
    created: u64,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Maximum number of retained conversations.
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Create a store holding one fresh, active conversation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a store with a custom capacity (at least 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let first = Conversation::new(
            ConversationId::new(),
            default_title(1),
            chrono::Utc::now().timestamp_millis(),
        );
        let active = first.id;
        let mut conversations = VecDeque::with_capacity(capacity + 1);
        conversations.push_front(first);
        Self {
            conversations,
            active,
            capacity,
            created: 1,
        }
    }

    /// Create a conversation at the front and make it active.
    ///
    /// Evicts the oldest conversation when the store is over capacity.
    pub fn create_conversation(&mut self) -> ConversationId {
        self.created += 1;
        let convo = Conversation::new(
            ConversationId::new(),
            default_title(self.created),
            chrono::Utc::now().timestamp_millis(),
        );
        let id = convo.id;
        self.conversations.push_front(convo);
        self.active = id;

        while self.conversations.len() > self.capacity {
            if let Some(evicted) = self.conversations.pop_back() {
                debug!(id = %evicted.id, title = %evicted.title, "evicted oldest conversation");
            }
        }

        debug!(%id, count = self.conversations.len(), "created conversation");
        id
    }

    /// The active conversation.
    ///
    /// # Errors
    /// Returns `NotFound` if the active id is stale.
    pub fn get_active(&self) -> StoreResult<&Conversation> {
        self.get(self.active)
    }

    /// Identifier of the active conversation.
    #[must_use]
    pub const fn active_id(&self) -> ConversationId {
        self.active
    }

    /// Look a conversation up by id.
    ///
    /// # Errors
    /// Returns `NotFound` if no conversation has this id.
    pub fn get(&self, id: ConversationId) -> StoreResult<&Conversation> {
        self.conversations
            .iter()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn get_mut(&mut self, id: ConversationId) -> StoreResult<&mut Conversation> {
        self.conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn position(&self, id: ConversationId) -> Option<usize> {
        self.conversations.iter().position(|c| c.id == id)
    }

    /// Whether a conversation with this id is present.
    #[must_use]
    pub fn contains(&self, id: ConversationId) -> bool {
        self.position(id).is_some()
    }

    /// Make `id` the active conversation.
    ///
    /// # Errors
    /// Returns `NotFound` if no conversation has this id.
    pub fn switch_active(&mut self, id: ConversationId) -> StoreResult<&Conversation> {
        if !self.contains(id) {
            return Err(StoreError::NotFound(id));
        }
        self.active = id;
        debug!(%id, "switched active conversation");
        self.get(id)
    }

    /// Remove a conversation.
    ///
    /// If it was active, the front conversation becomes active.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id and `LastConversation` when it is
    /// the only one left; the store is unchanged in both cases.
    pub fn delete_conversation(&mut self, id: ConversationId) -> StoreResult<DeleteOutcome> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        if self.conversations.len() == 1 {
            return Err(StoreError::LastConversation);
        }

        self.conversations.remove(index);

        let new_active = if self.active == id {
            let front = self
                .conversations
                .front()
                .map(|c| c.id)
                .ok_or(StoreError::LastConversation)?;
            self.active = front;
            Some(front)
        } else {
            None
        };

        debug!(%id, ?new_active, "deleted conversation");
        Ok(DeleteOutcome {
            removed: id,
            new_active,
        })
    }

    /// Append a message to a conversation.
    ///
    /// The first user message names the conversation while it still has its
    /// default title (see [`title_from_message`]). Bot replies and notices
    /// never do.
    ///
    /// # Errors
    /// Returns `NotFound` if the conversation is gone.
    pub fn append_message(
        &mut self,
        id: ConversationId,
        sender: Sender,
        text: impl Into<String>,
    ) -> StoreResult<&Conversation> {
        let convo = self.get_mut(id)?;
        let message = ChatMessage::now(sender, text);

        if sender == Sender::User && convo.title_is_default() {
            if let Some(title) = title_from_message(&message.text) {
                debug!(%id, %title, "derived title from first message");
                convo.title = title;
                convo.title_source = TitleSource::FirstMessage;
            }
        }

        convo.messages.push(message);
        Ok(&*convo)
    }

    /// Append a message without applying the first-message title rule.
    ///
    /// Used for status lines such as upload announcements.
    ///
    /// # Errors
    /// Returns `NotFound` if the conversation is gone.
    pub fn append_notice(
        &mut self,
        id: ConversationId,
        sender: Sender,
        text: impl Into<String>,
    ) -> StoreResult<&Conversation> {
        let convo = self.get_mut(id)?;
        convo.messages.push(ChatMessage::now(sender, text));
        Ok(&*convo)
    }

    /// Attach CSV metadata to a conversation.
    ///
    /// Names the conversation after the file unless a title was already
    /// derived. The first attachment is kept; later uploads leave the
    /// metadata untouched.
    ///
    /// # Errors
    /// Returns `NotFound` if the conversation is gone.
    pub fn record_upload(
        &mut self,
        id: ConversationId,
        file_name: impl Into<String>,
        columns: Option<Vec<String>>,
    ) -> StoreResult<&Conversation> {
        let convo = self.get_mut(id)?;
        let file_name = file_name.into();

        if convo.title_is_default() {
            convo.title = title_from_file_name(&file_name);
            convo.title_source = TitleSource::Upload;
        }
        if let Some(existing) = &convo.csv_file {
            debug!(%id, %existing, ignored = %file_name, "conversation already has a file");
            return Ok(&*convo);
        }
        convo.csv_file = Some(file_name);
        convo.csv_columns = columns;

        debug!(%id, file = ?convo.csv_file, "recorded upload");
        Ok(&*convo)
    }

    /// Conversations from most to least recently created.
    pub fn conversations(&self) -> impl Iterator<Item = &Conversation> {
        self.conversations.iter()
    }

    /// Id of the conversation at `index` (0 = most recent).
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<ConversationId> {
        self.conversations.get(index).map(|c| c.id)
    }

    /// Number of conversations held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversation.
    ///
    /// Construction and the delete rules keep at least one conversation, so
    /// this never holds for a live store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Maximum number of retained conversations.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(store: &ConversationStore) -> Vec<ConversationId> {
        store.conversations().map(|c| c.id).collect()
    }

    #[test]
    fn test_new_store_has_one_active_conversation() {
        let store = ConversationStore::new();
        assert_eq!(store.len(), 1);
        let active = store.get_active().unwrap();
        assert_eq!(active.title, "New Conversation 1");
        assert_eq!(store.id_at(0), Some(store.active_id()));
    }

    #[test]
    fn test_create_inserts_at_front_and_activates() {
        let mut store = ConversationStore::new();
        let first = store.active_id();
        let second = store.create_conversation();
        assert_eq!(ids(&store), vec![second, first]);
        assert_eq!(store.active_id(), second);
        assert_eq!(store.get(second).unwrap().title, "New Conversation 2");
    }

    #[test]
    fn test_overflow_evicts_only_the_oldest() {
        let mut store = ConversationStore::new();
        let oldest = store.active_id();
        for _ in 1..ConversationStore::DEFAULT_CAPACITY {
            store.create_conversation();
        }
        assert_eq!(store.len(), 10);
        let before = ids(&store);

        let newest = store.create_conversation();
        assert_eq!(store.len(), 10);
        assert!(!store.contains(oldest));

        let mut expected = vec![newest];
        expected.extend_from_slice(&before[..9]);
        assert_eq!(ids(&store), expected);
    }

    #[test]
    fn test_counter_keeps_growing_after_eviction() {
        let mut store = ConversationStore::with_capacity(2);
        store.create_conversation();
        let third = store.create_conversation();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(third).unwrap().title, "New Conversation 3");
    }

    #[test]
    fn test_capacity_is_at_least_one() {
        let mut store = ConversationStore::with_capacity(0);
        assert_eq!(store.capacity(), 1);
        let id = store.create_conversation();
        assert_eq!(ids(&store), vec![id]);
    }

    #[test]
    fn test_delete_last_conversation_is_rejected() {
        let mut store = ConversationStore::new();
        let only = store.active_id();
        store.append_message(only, Sender::User, "keep me").unwrap();
        let snapshot = store.get(only).unwrap().clone();

        assert_eq!(
            store.delete_conversation(only),
            Err(StoreError::LastConversation)
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(only).unwrap(), &snapshot);
        assert_eq!(store.active_id(), only);
    }

    #[test]
    fn test_delete_active_promotes_front() {
        let mut store = ConversationStore::new();
        let a = store.active_id();
        let b = store.create_conversation();
        let c = store.create_conversation();
        store.switch_active(b).unwrap();

        let outcome = store.delete_conversation(b).unwrap();
        assert_eq!(outcome.new_active, Some(c));
        assert!(outcome.active_changed());
        assert_eq!(store.active_id(), c);
        assert_eq!(ids(&store), vec![c, a]);
    }

    #[test]
    fn test_delete_inactive_keeps_selection() {
        let mut store = ConversationStore::new();
        let a = store.active_id();
        let b = store.create_conversation();

        let outcome = store.delete_conversation(a).unwrap();
        assert_eq!(outcome.new_active, None);
        assert_eq!(store.active_id(), b);
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let mut store = ConversationStore::new();
        let ghost = ConversationId::new();
        assert_eq!(store.switch_active(ghost).err(), Some(StoreError::NotFound(ghost)));
        assert_eq!(
            store.delete_conversation(ghost),
            Err(StoreError::NotFound(ghost))
        );
        assert_eq!(
            store.append_message(ghost, Sender::Bot, "late").err(),
            Some(StoreError::NotFound(ghost))
        );
    }

    #[test]
    fn test_first_user_message_sets_title_once() {
        let mut store = ConversationStore::new();
        let id = store.active_id();
        store
            .append_message(id, Sender::User, "hello world this is a long test message")
            .unwrap();
        assert_eq!(store.get(id).unwrap().title, "hello world this is a…");

        store.append_message(id, Sender::User, "something else").unwrap();
        let convo = store.get(id).unwrap();
        assert_eq!(convo.title, "hello world this is a…");
        assert_eq!(convo.title_source, TitleSource::FirstMessage);
        assert_eq!(convo.messages.len(), 2);
    }

    #[test]
    fn test_short_first_message_has_no_ellipsis() {
        let mut store = ConversationStore::new();
        let id = store.active_id();
        store.append_message(id, Sender::User, "hi").unwrap();
        assert_eq!(store.get(id).unwrap().title, "hi");
    }

    #[test]
    fn test_bot_message_does_not_name_conversation() {
        let mut store = ConversationStore::new();
        let id = store.active_id();
        store.append_message(id, Sender::Bot, "welcome").unwrap();
        assert_eq!(store.get(id).unwrap().title, "New Conversation 1");

        store.append_message(id, Sender::User, "question").unwrap();
        let convo = store.get(id).unwrap();
        assert_eq!(convo.title, "question");
        assert_eq!(convo.title_source, TitleSource::FirstMessage);
    }

    #[test]
    fn test_user_message_after_notice_names_conversation() {
        let mut store = ConversationStore::new();
        let id = store.active_id();
        store
            .append_notice(id, Sender::User, "Enviando arquivo: sales.csv")
            .unwrap();
        store.append_message(id, Sender::Bot, "Erro").unwrap();
        store
            .append_message(id, Sender::User, "quantas vendas por mes")
            .unwrap();
        assert_eq!(store.get(id).unwrap().title, "quantas vendas por mes");
    }

    #[test]
    fn test_second_upload_keeps_first_attachment() {
        let mut store = ConversationStore::new();
        let id = store.active_id();
        store
            .record_upload(id, "sales.csv", Some(vec!["date".to_string()]))
            .unwrap();
        store
            .record_upload(id, "costs.csv", Some(vec!["item".to_string()]))
            .unwrap();
        let convo = store.get(id).unwrap();
        assert_eq!(convo.title, "sales");
        assert_eq!(convo.csv_file.as_deref(), Some("sales.csv"));
        assert_eq!(convo.csv_columns, Some(vec!["date".to_string()]));
    }

    #[test]
    fn test_record_upload_sets_metadata_and_title() {
        let mut store = ConversationStore::new();
        let id = store.active_id();
        store
            .record_upload(
                id,
                "sales.csv",
                Some(vec!["date".to_string(), "amount".to_string()]),
            )
            .unwrap();
        let convo = store.get(id).unwrap();
        assert_eq!(convo.title, "sales");
        assert_eq!(convo.csv_file.as_deref(), Some("sales.csv"));
        assert_eq!(
            convo.csv_columns,
            Some(vec!["date".to_string(), "amount".to_string()])
        );
    }

    #[test]
    fn test_upload_after_message_keeps_message_title() {
        let mut store = ConversationStore::new();
        let id = store.active_id();
        store.append_message(id, Sender::User, "hi").unwrap();
        store.record_upload(id, "sales.csv", None).unwrap();
        let convo = store.get(id).unwrap();
        assert_eq!(convo.title, "hi");
        assert!(convo.has_csv());
    }

    #[test]
    fn test_notice_does_not_name_conversation() {
        let mut store = ConversationStore::new();
        let id = store.active_id();
        store
            .append_notice(id, Sender::User, "Enviando arquivo: data.CSV")
            .unwrap();
        store.record_upload(id, "data.CSV", Some(Vec::new())).unwrap();
        assert_eq!(store.get(id).unwrap().title, "data.CSV");
    }

    #[test]
    fn test_new_messages_do_not_reorder() {
        let mut store = ConversationStore::new();
        let a = store.active_id();
        let b = store.create_conversation();
        store.append_message(a, Sender::User, "bump").unwrap();
        assert_eq!(ids(&store), vec![b, a]);
    }
}
