//! Terminal UI layer for the chat session.
//!
//! The UI module owns rendering, layout, keyboard handling, and loop control
//! for the text user interface.
//!
//! Key submodules include:
//! - [`chat_loop`]: the event loop that routes input to [`crate::core::app::App`]
//!   and runs gateway calls on background tasks.
//! - [`renderer`] and [`transcript`]: frame composition and the wrapped
//!   message rows it scrolls through.
//! - [`markdown`], [`wrap`], and [`theme`]: text formatting and color policy.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns the conversation and the model gateway.

pub mod chat_loop;
pub mod markdown;
pub mod renderer;
pub mod theme;
pub mod transcript;
pub mod wrap;
