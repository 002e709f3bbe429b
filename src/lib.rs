//! Spark is a full-screen terminal chat client for the Gemini API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, the composer with its optional image
//!   attachment, and the gateway that calls the model.
//! - [`ui`] renders the transcript as markdown and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`api`] defines the `generateContent` request and response payloads.
//! - [`utils`] collects logging setup, URL helpers and input sanitizing.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which loads configuration, builds the
//! [`core::gateway::ModelGateway`] and hands off to [`ui::chat_loop`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
