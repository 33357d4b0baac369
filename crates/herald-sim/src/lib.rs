//! # herald-sim
//!
//! Simulated conversations. Inbound text is resolved against a flow's
//! triggers, replies are appended to append-only logs, and every appended
//! message is fanned out to subscribers in registration order.
//!
//! Nothing here is sent anywhere.

pub mod bus;
pub mod inbox;
pub mod log;
pub mod preview_chat;
pub mod triggers;

pub use bus::{ConversationEvent, EventBus, EventKind, ListenerId};
pub use inbox::{Inbox, Thread};
pub use log::ConversationLog;
pub use preview_chat::PreviewChat;
pub use triggers::{find_block, find_trigger, normalize, TriggerEngine};
