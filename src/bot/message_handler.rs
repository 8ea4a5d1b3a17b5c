//! Message Handler module for processing commands and free-text messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info};

use crate::dialogue::{SessionDialogue, SessionState};

use super::dialogue_manager::{
    handle_search_text, plan_comparison, route_text, run_comparison, CompareStep, SearchOutcome, TextRoute,
};
use super::ui_builder::{
    cancelled_screen, coin_price_screen, compare_failed_screen, compare_fetching_screen,
    compare_need_two_screen, compare_result_screen, help_screen, join_channel_screen,
    main_menu_screen, search_not_found_screen, PriceOrigin,
};
use super::{send_screen, user_language, AppContext};

/// Commands understood by the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "show help")]
    Help,
    #[command(description = "cancel the current operation")]
    Cancel,
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: SessionDialogue,
    app: Arc<AppContext>,
) -> Result<()> {
    let language_code = user_language(msg.from.as_ref());
    debug!(user_id = %msg.chat.id, command = ?cmd, "Received command");

    match cmd {
        Command::Start => handle_start(&bot, &msg, &app, language_code).await,
        Command::Help => send_screen(&bot, msg.chat.id, help_screen(language_code)).await,
        Command::Cancel => handle_cancel(&bot, &msg, dialogue, language_code).await,
    }
}

/// `/cancel`: leave whatever mode is active
async fn handle_cancel(bot: &Bot, msg: &Message, dialogue: SessionDialogue, language_code: Option<&str>) -> Result<()> {
    let was_comparing = dialogue.get_or_default().await? == SessionState::Comparing;
    dialogue.exit().await?;
    info!(user_id = %msg.chat.id, was_comparing, "Session cancelled");
    send_screen(bot, msg.chat.id, cancelled_screen(was_comparing, language_code)).await
}

/// `/start`: gate on channel membership, then show the main menu
async fn handle_start(bot: &Bot, msg: &Message, app: &AppContext, language_code: Option<&str>) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    if !app.membership.is_member(user.id).await {
        info!(user_id = %user.id, "User is not a channel member, showing join screen");
        let join_url = app.join_url();
        let screen = join_channel_screen(&user.first_name, join_url.as_deref(), language_code);
        return send_screen(bot, msg.chat.id, screen).await;
    }

    send_screen(bot, msg.chat.id, main_menu_screen(language_code)).await
}

/// Plain text that is not a known command
///
/// Routing follows the session state, see [`route_text`].
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: SessionDialogue,
    app: Arc<AppContext>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let language_code = user_language(msg.from.as_ref());
    let state = dialogue.get_or_default().await?;
    debug!(user_id = %msg.chat.id, state = ?state, message_length = text.len(), "Received text message");

    match route_text(&state, text) {
        TextRoute::Cancel => handle_cancel(&bot, &msg, dialogue, language_code).await,
        TextRoute::Compare => handle_compare_input(&bot, &msg, text, dialogue, &app, language_code).await,
        TextRoute::Search => handle_coin_search(&bot, &msg, text, dialogue, &app, language_code).await,
        TextRoute::Ignore => {
            debug!(user_id = %msg.chat.id, state = ?state, "Ignoring text message");
            Ok(())
        }
    }
}

async fn handle_compare_input(
    bot: &Bot,
    msg: &Message,
    text: &str,
    dialogue: SessionDialogue,
    app: &AppContext,
    language_code: Option<&str>,
) -> Result<()> {
    let step = match plan_comparison(text) {
        Ok((first, second)) => {
            send_screen(bot, msg.chat.id, compare_fetching_screen(language_code)).await?;
            run_comparison(first, second, app.prices.as_ref()).await
        }
        Err(step) => step,
    };

    let screen = match &step {
        CompareStep::Cancelled => cancelled_screen(true, language_code),
        CompareStep::NeedTwoCoins => compare_need_two_screen(language_code),
        CompareStep::Unavailable { missing } => compare_failed_screen(missing, language_code),
        CompareStep::Compared(comparison) => compare_result_screen(comparison, language_code),
    };

    match step.next_state() {
        SessionState::Idle => dialogue.exit().await?,
        next => dialogue.update(next).await?,
    }

    send_screen(bot, msg.chat.id, screen).await
}

async fn handle_coin_search(
    bot: &Bot,
    msg: &Message,
    text: &str,
    dialogue: SessionDialogue,
    app: &AppContext,
    language_code: Option<&str>,
) -> Result<()> {
    let outcome = handle_search_text(text, app.prices.as_ref()).await;

    // One attempt only, whatever the result
    dialogue.update(outcome.next_state()).await?;

    let screen = match outcome {
        SearchOutcome::Found { coin, price } => {
            info!(user_id = %msg.chat.id, coin = %coin, "Coin search succeeded");
            coin_price_screen(&coin, price, PriceOrigin::Search, language_code)
        }
        SearchOutcome::NotFound { coin } => search_not_found_screen(&coin, language_code),
        SearchOutcome::Empty => return Ok(()),
    };

    send_screen(bot, msg.chat.id, screen).await
}
