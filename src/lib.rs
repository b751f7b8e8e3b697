//! Conversation-state core of a CSV data-analysis chat client.
//!
//! A bounded, in-memory store of conversation threads, a one-way projection
//! of that store onto a renderer, and an HTTP transport for the backend's
//! `/chat` and `/upload_csv` endpoints.

// Interdiction stricte de pratiques dangereuses ou non idiomatiques
#![deny(unsafe_code)] // Le code unsafe est interdit
#![deny(missing_docs)] // Toute fonction, struct, enum ou module public doit être documenté
#![warn(dead_code)] // Le code inutilisé est signalé
#![deny(non_camel_case_types)]
#![deny(unused_must_use)] // Oblige à gérer explicitement les Result et Option
#![deny(nonstandard_style)] // Empêche tout style de code non standard

// Clippy pour stricte discipline
#![deny(clippy::all)] // Active toutes les lints Clippy standard
#![deny(clippy::pedantic)] // Active les lints très strictes de Clippy
#![cfg_attr(not(test), deny(clippy::unwrap_used))] // Interdit unwrap()
#![cfg_attr(not(test), deny(clippy::expect_used))] // Interdit expect()
#![cfg_attr(not(test), deny(clippy::panic))] // Interdit panic!()
#![deny(clippy::print_stdout)] // Interdit println!() en production
#![deny(clippy::todo)] // Interdit les TODO dans le code
#![deny(clippy::unimplemented)] // Interdit les fonctions non implémentées
#![deny(clippy::redundant_clone)] // Interdit les clones inutiles

/// Client configuration (backend URL, timeouts, history limit).
pub mod config;
/// Conversation records, title rules and the bounded store.
pub mod conversation;
/// Store projection and renderers.
pub mod render;
/// Event handling: input validation, request tagging, completion routing.
pub mod session;
/// Entry helpers to start the terminal client.
pub mod start_csvchat;
/// User-visible strings.
pub mod text;
/// Backend transport over HTTP.
pub mod transport;

pub use config::ClientConfig;
pub use conversation::{
    ChatMessage, Conversation, ConversationId, ConversationStore, Sender, StoreError, StoreResult,
};
pub use render::{project, Renderer, StoreView, TerminalRenderer};
pub use session::{dispatch, ChatSession, Completion, PendingRequest};
pub use transport::{HttpTransport, Transport, TransportError};
