//! Telegram Bot API Adapter
//!
//! Long-polling transport for the chat interface: command parsing,
//! message formatting, and the update dispatch loop.

mod bot;
mod commands;
mod format;

pub use bot::{BotHandlers, TelegramBot, TelegramBotConfig, TelegramError};
pub use commands::{BotCommand, CommandError};
