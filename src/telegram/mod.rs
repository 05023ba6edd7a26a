//! Minimal Telegram Bot API surface: wire types and a method-agnostic client.

pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{Message, ParseMode, SendMessageRequest, Update};
