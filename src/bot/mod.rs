//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles commands and free-text messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats messages
//! - `dialogue_manager`: Decides compare and search transitions
//! - `actions`: Callback data encoding of button actions

pub mod actions;
pub mod callback_handler;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use std::sync::Arc;

use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::{HandlerExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::payloads::{EditMessageTextSetters, SendMessageSetters};
use teloxide::types::{CallbackQuery, ChatId, MaybeInaccessibleMessage, Message, ParseMode, Update, User};
use tracing::warn;

use crate::config::BotConfig;
use crate::dialogue::SessionState;
use crate::membership::{channel_join_url, MembershipGate};
use crate::price_client::PriceSource;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::{command_handler, message_handler, Command};

use ui_builder::Screen;

/// Shared services injected into every handler
pub struct AppContext {
    pub config: Arc<BotConfig>,
    pub prices: Arc<dyn PriceSource>,
    pub membership: MembershipGate,
}

impl AppContext {
    pub fn new(config: Arc<BotConfig>, prices: Arc<dyn PriceSource>, membership: MembershipGate) -> Self {
        Self {
            config,
            prices,
            membership,
        }
    }

    /// Invite link of the required channel, when it has one
    pub fn join_url(&self) -> Option<String> {
        channel_join_url(&self.config.required_channel)
    }
}

/// Build the update dispatch tree
///
/// Commands are matched first, then plain text is routed by session state
/// (compare dialogue before the search consumer, see `message_handler`).
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let message_branch = Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<SessionState>, SessionState>()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(dptree::endpoint(message_handler));

    let callback_branch = Update::filter_callback_query()
        .enter_dialogue::<CallbackQuery, InMemStorage<SessionState>, SessionState>()
        .endpoint(callback_handler);

    dptree::entry().branch(message_branch).branch(callback_branch)
}

/// Send a screen as a new message
pub async fn send_screen(bot: &Bot, chat_id: ChatId, screen: Screen) -> anyhow::Result<()> {
    let mut request = bot.send_message(chat_id, screen.text).parse_mode(ParseMode::Html);
    if let Some(keyboard) = screen.keyboard {
        request = request.reply_markup(keyboard);
    }
    request.await?;
    Ok(())
}

/// Replace the text and keyboard of the message a button belongs to
///
/// Edit failures (most often "message is not modified" on a refresh with
/// unchanged prices) are logged and swallowed.
pub async fn edit_screen(bot: &Bot, message: &MaybeInaccessibleMessage, screen: Screen) {
    let mut request = bot
        .edit_message_text(message.chat().id, message.id(), screen.text)
        .parse_mode(ParseMode::Html);
    if let Some(keyboard) = screen.keyboard {
        request = request.reply_markup(keyboard);
    }
    if let Err(e) = request.await {
        warn!(chat_id = %message.chat().id, error = %e, "Failed to edit message");
    }
}

/// Language code of a Telegram user, if the client reported one
pub fn user_language(user: Option<&User>) -> Option<&str> {
    user.and_then(|user| user.language_code.as_deref())
}
