//! Event-handling layer between the UI, the store and the transport.
//!
//! Every outbound request carries the id of the conversation it was issued
//! from; completions are applied by id, so a reply lands in its originating
//! conversation even after the user switched away, and is dropped if that
//! conversation was deleted in the meantime.

pub mod command;

pub use command::{Command, CommandError};

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::conversation::{
    ConversationId, ConversationStore, RequestId, Sender, StoreError, StoreResult,
};
use crate::render::{project, Renderer};
use crate::text;
use crate::transport::{CsvUpload, Transport, TransportResult, UploadReply};

/// Work to send to the backend, tagged with its originating conversation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingRequest {
    /// Correlation id for logs.
    pub request_id: RequestId,
    /// Conversation the request was issued from.
    pub conversation_id: ConversationId,
    /// What to send.
    pub kind: RequestKind,
}

/// Payload of a [`PendingRequest`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RequestKind {
    /// Chat message for `POST /chat`.
    Chat {
        /// Trimmed user message.
        message: String,
    },
    /// File for `POST /upload_csv`.
    Upload {
        /// Display name of the file.
        file_name: String,
        /// Where to read it from.
        path: PathBuf,
    },
}

/// Result of a transport call, still tagged with its conversation.
#[derive(Debug)]
pub struct Completion {
    /// Correlation id of the originating request.
    pub request_id: RequestId,
    /// Conversation the request was issued from.
    pub conversation_id: ConversationId,
    /// What came back.
    pub outcome: Outcome,
}

/// Transport result of a [`Completion`].
#[derive(Debug)]
pub enum Outcome {
    /// Reply to a chat message.
    Chat(TransportResult<String>),
    /// Reply to an upload.
    Upload {
        /// Name of the uploaded file.
        file_name: String,
        /// Backend answer.
        result: TransportResult<UploadReply>,
    },
}

/// Perform a request against the transport.
///
/// Owns nothing from the session, so it can run on a spawned task while the
/// session keeps handling input.
pub async fn dispatch<T>(transport: Arc<T>, request: PendingRequest) -> Completion
where
    T: Transport + ?Sized,
{
    let PendingRequest {
        request_id,
        conversation_id,
        kind,
    } = request;
    debug!(request = %request_id.short(), conversation = %conversation_id.short(), "dispatching");

    let outcome = match kind {
        RequestKind::Chat { message } => Outcome::Chat(transport.send_chat(&message).await),
        RequestKind::Upload { file_name, path } => {
            let result = match CsvUpload::from_path(&path).await {
                Ok(upload) => transport.upload_csv(upload).await,
                Err(err) => Err(err),
            };
            Outcome::Upload { file_name, result }
        }
    };

    Completion {
        request_id,
        conversation_id,
        outcome,
    }
}

/// Owns the conversation store and keeps the renderer in sync with it.
pub struct ChatSession<R: Renderer> {
    store: ConversationStore,
    renderer: R,
}

impl<R: Renderer> ChatSession<R> {
    /// Start a session and draw the first frame.
    pub fn new(store: ConversationStore, renderer: R) -> Self {
        let mut session = Self { store, renderer };
        session.render();
        session
    }

    /// Read-only access to the store.
    #[must_use]
    pub const fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Borrow the renderer.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Redraw the whole UI from the store.
    pub fn render(&mut self) {
        let view = project(&self.store);
        self.renderer.render(&view);
    }

    /// Show a notice without touching the store.
    pub fn notify(&mut self, notice: &str) {
        self.renderer.notify(notice);
    }

    /// Open a fresh conversation and show it.
    pub fn new_conversation(&mut self) -> ConversationId {
        let id = self.store.create_conversation();
        self.render();
        id
    }

    /// Show another conversation.
    ///
    /// # Errors
    /// Returns `NotFound` if the conversation does not exist.
    pub fn switch_to(&mut self, id: ConversationId) -> StoreResult<()> {
        self.store.switch_active(id)?;
        self.render();
        Ok(())
    }

    /// Delete a conversation.
    ///
    /// Deleting the last conversation is refused with a notice.
    ///
    /// # Errors
    /// `LastConversation` or `NotFound`; the store is unchanged.
    pub fn delete(&mut self, id: ConversationId) -> StoreResult<()> {
        match self.store.delete_conversation(id) {
            Ok(outcome) => {
                if outcome.active_changed() {
                    debug!(?outcome.new_active, "active conversation deleted");
                }
                self.render();
                Ok(())
            }
            Err(err) => {
                if err.is_user_facing() {
                    self.renderer.notify(text::LAST_CONVERSATION);
                }
                Err(err)
            }
        }
    }

    /// Handle a typed message.
    ///
    /// Blank input gets a local bot prompt and no request.
    pub fn submit_message(&mut self, input: &str) -> Option<PendingRequest> {
        let conversation_id = self.store.active_id();
        let message = input.trim();

        if message.is_empty() {
            self.append_and_render(conversation_id, Sender::Bot, text::EMPTY_MESSAGE);
            return None;
        }

        self.append_and_render(conversation_id, Sender::User, message)?;
        Some(PendingRequest {
            request_id: RequestId::new(),
            conversation_id,
            kind: RequestKind::Chat {
                message: message.to_string(),
            },
        })
    }

    /// Handle an upload action.
    ///
    /// `None` means no file was selected and gets a local bot prompt.
    pub fn submit_upload(&mut self, path: Option<PathBuf>) -> Option<PendingRequest> {
        let conversation_id = self.store.active_id();

        let Some(path) = path else {
            self.append_and_render(conversation_id, Sender::Bot, text::NO_FILE_SELECTED);
            return None;
        };

        let file_name = crate::transport::types::file_name_of(&path);
        self.store
            .append_notice(conversation_id, Sender::User, text::uploading(&file_name))
            .ok()?;
        self.render();

        Some(PendingRequest {
            request_id: RequestId::new(),
            conversation_id,
            kind: RequestKind::Upload { file_name, path },
        })
    }

    /// Apply a finished request to its originating conversation.
    ///
    /// Returns `false` when that conversation no longer exists.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let Completion {
            request_id,
            conversation_id: id,
            outcome,
        } = completion;

        if !self.store.contains(id) {
            info!(request = %request_id.short(), conversation = %id.short(), "dropping reply for deleted conversation");
            return false;
        }

        let applied = match outcome {
            Outcome::Chat(Ok(reply)) => self.store.append_message(id, Sender::Bot, reply).map(|_| ()),
            Outcome::Chat(Err(err)) => {
                warn!(request = %request_id.short(), %err, "chat request failed");
                self.store
                    .append_message(id, Sender::Bot, text::CHAT_FAILED)
                    .map(|_| ())
            }
            Outcome::Upload {
                file_name,
                result: Ok(reply),
            } => self.apply_upload(id, file_name, reply),
            Outcome::Upload {
                file_name,
                result: Err(err),
            } => {
                warn!(request = %request_id.short(), file = %file_name, %err, "upload failed");
                self.store
                    .append_message(id, Sender::Bot, text::UPLOAD_FAILED)
                    .map(|_| ())
            }
        };

        match applied {
            Ok(()) => {
                self.render();
                true
            }
            Err(StoreError::NotFound(_)) => false,
            Err(err) => {
                warn!(%err, "could not apply completion");
                false
            }
        }
    }

    fn apply_upload(
        &mut self,
        id: ConversationId,
        file_name: String,
        reply: UploadReply,
    ) -> StoreResult<()> {
        let UploadReply { message, columns } = reply;
        match columns {
            Some(columns) => {
                let body = text::upload_accepted(&message, &columns);
                self.store.record_upload(id, file_name, Some(columns))?;
                self.store.append_message(id, Sender::Bot, body)?;
            }
            None => {
                self.store.append_message(id, Sender::Bot, message)?;
            }
        }
        Ok(())
    }

    fn append_and_render(
        &mut self,
        id: ConversationId,
        sender: Sender,
        body: &str,
    ) -> Option<()> {
        match self.store.append_message(id, sender, body) {
            Ok(_) => {
                self.render();
                Some(())
            }
            Err(err) => {
                warn!(%err, "could not append message");
                None
            }
        }
    }

    /// Tear the session down, returning its parts.
    pub fn into_parts(self) -> (ConversationStore, R) {
        (self.store, self.renderer)
    }
}
