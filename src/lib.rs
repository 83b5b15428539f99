//! Causerie is a line-oriented terminal chat client for remote LLM APIs.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation record, its on-disk store,
//!   configuration, and the chat session that ties transcript mutation to
//!   persistence.
//! - [`api`] defines the chat-completions payloads and the HTTP client
//!   used to forward transcripts to the remote endpoint.
//! - [`ui`] implements the interactive surface: conversation selection,
//!   multi-line input collection, styled output, and the chat loop.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which initializes the runtime and
//! dispatches into [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
