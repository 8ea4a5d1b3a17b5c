//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, MaybeInaccessibleMessage};
use tracing::{debug, info};

use crate::coin::{displayable_price, CoinId};
use crate::dialogue::{SessionDialogue, SessionState};

use super::actions::CallbackAction;
use super::ui_builder::{
    coin_picker_screen, coin_price_failed_screen, coin_price_screen, compare_prompt_screen,
    compare_with_prompt_screen, help_screen, main_menu_screen, membership_check_screens,
    popular_prices_screen, search_prompt_screen, PriceOrigin, Screen,
};
use super::{edit_screen, user_language, AppContext};

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: SessionDialogue,
    app: Arc<AppContext>,
) -> Result<()> {
    // Answer first so the client stops its loading indicator
    bot.answer_callback_query(q.id.clone()).await?;

    let data = q.data.as_deref().unwrap_or("");
    debug!(user_id = %q.from.id, callback_data = %data, "Received callback query from user");

    let Some(action) = CallbackAction::parse(data) else {
        // Unknown buttons are ignored
        return Ok(());
    };
    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let language_code = user_language(Some(&q.from));

    match action {
        CallbackAction::CheckMembership => {
            let is_member = app.membership.is_member(q.from.id).await;
            info!(user_id = %q.from.id, is_member, "Membership re-checked");
            for screen in membership_check_screens(is_member, language_code) {
                edit_screen(&bot, message, screen).await;
            }
        }
        CallbackAction::PriceSingle => {
            edit_screen(&bot, message, coin_picker_screen(language_code)).await;
        }
        CallbackAction::PriceCompare => {
            edit_screen(&bot, message, compare_prompt_screen(language_code)).await;
            dialogue.update(SessionState::Comparing).await?;
        }
        CallbackAction::PopularPrices => {
            let screen = popular_prices_screen(app.prices.as_ref(), language_code).await;
            edit_screen(&bot, message, screen).await;
        }
        CallbackAction::Help => {
            edit_screen(&bot, message, help_screen(language_code)).await;
        }
        CallbackAction::BackToMenu => {
            edit_screen(&bot, message, main_menu_screen(language_code)).await;
        }
        CallbackAction::SearchCoin => {
            edit_screen(&bot, message, search_prompt_screen(language_code)).await;
            dialogue.update(SessionState::AwaitingCoinSearch).await?;
        }
        CallbackAction::CoinPrice(coin) => {
            let screen = coin_price_view(&coin, &app, language_code).await;
            edit_screen(&bot, message, screen).await;
        }
        CallbackAction::CompareWith(base) => {
            show_compare_with(&bot, message, &dialogue, base, language_code).await?;
        }
    }

    Ok(())
}

async fn coin_price_view(coin: &CoinId, app: &AppContext, language_code: Option<&str>) -> Screen {
    match displayable_price(app.prices.usd_price(coin).await) {
        Some(price) => coin_price_screen(coin, price, PriceOrigin::Picker, language_code),
        None => coin_price_failed_screen(coin, language_code),
    }
}

/// "Compare with": remember the base coin and ask for the second one
async fn show_compare_with(
    bot: &Bot,
    message: &MaybeInaccessibleMessage,
    dialogue: &SessionDialogue,
    base: CoinId,
    language_code: Option<&str>,
) -> Result<()> {
    edit_screen(bot, message, compare_with_prompt_screen(&base, language_code)).await;
    dialogue.update(SessionState::AwaitingCompareCoin { base }).await?;
    Ok(())
}
