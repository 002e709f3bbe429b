//! Runtime state for a chat session.
//!
//! [`conversation`] owns the message list and the in-flight flag,
//! [`composer`] holds the draft and the pending image, and [`gateway`]
//! turns a finished draft into a `generateContent` call. [`app`] ties them
//! together for the UI layer.

pub mod app;
pub mod composer;
pub mod config;
pub mod conversation;
pub mod gateway;
pub mod message;
