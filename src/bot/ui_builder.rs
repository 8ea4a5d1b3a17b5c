//! UI Builder module for creating keyboards and formatting messages
//!
//! Every screen is a [`Screen`]: an HTML text body plus an optional inline
//! keyboard. Rendering is pure so handlers only decide *which* screen to
//! show and *where* (edit in place or send new).

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html::escape;

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::coin::{displayable_price, format_ratio, format_usd, CoinId, PICKER_COINS, POPULAR_COINS};
use crate::dialogue::PriceComparison;
use crate::price_client::PriceSource;

use super::actions::{fits_callback_data, CallbackAction};

/// A rendered message: HTML text and optional inline keyboard
#[derive(Clone, Debug, PartialEq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Screen {
    pub fn text(text: String) -> Self {
        Self { text, keyboard: None }
    }

    pub fn with_keyboard(text: String, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            text,
            keyboard: Some(keyboard),
        }
    }
}

/// Where the user came from when a coin price is shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceOrigin {
    /// A button on the coin picker, "back" returns to the list
    Picker,
    /// Free-text search, "back" returns to the main menu
    Search,
}

fn button(label: String, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.to_data())
}

fn back_to_menu_row(lang: Option<&str>) -> Vec<InlineKeyboardButton> {
    vec![button(t_lang("back-to-menu-button", lang), CallbackAction::BackToMenu)]
}

/// Screen shown when the membership gate refuses access
pub fn join_channel_screen(first_name: &str, join_url: Option<&str>, lang: Option<&str>) -> Screen {
    let text = format!(
        "{}\n\n{}\n{}",
        t_args_lang("join-greeting", &[("name", escape(first_name).as_str())], lang),
        t_lang("join-description", lang),
        t_lang("join-instructions", lang)
    );

    let mut rows = Vec::new();
    if let Some(url) = join_url.and_then(|url| reqwest::Url::parse(url).ok()) {
        rows.push(vec![InlineKeyboardButton::url(t_lang("join-channel-button", lang), url)]);
    }
    rows.push(vec![button(
        t_lang("check-membership-button", lang),
        CallbackAction::CheckMembership,
    )]);

    Screen::with_keyboard(text, InlineKeyboardMarkup::new(rows))
}

/// Reply to "check membership" when the user has still not joined
pub fn membership_missing_screen(lang: Option<&str>) -> Screen {
    Screen::text(format!(
        "{}\n{}",
        t_lang("membership-missing", lang),
        t_lang("membership-missing-hint", lang)
    ))
}

pub fn membership_confirmed_screen(lang: Option<&str>) -> Screen {
    Screen::text(t_lang("membership-confirmed", lang))
}

/// Screens a "check membership" press edits into its message, in order
///
/// A confirmed member sees the confirmation, then the main menu replaces it.
pub fn membership_check_screens(is_member: bool, lang: Option<&str>) -> Vec<Screen> {
    if is_member {
        vec![membership_confirmed_screen(lang), main_menu_screen(lang)]
    } else {
        vec![membership_missing_screen(lang)]
    }
}

pub fn main_menu_screen(lang: Option<&str>) -> Screen {
    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![button(t_lang("menu-coin-price", lang), CallbackAction::PriceSingle)],
        vec![button(t_lang("menu-compare", lang), CallbackAction::PriceCompare)],
        vec![button(t_lang("menu-popular", lang), CallbackAction::PopularPrices)],
        vec![button(t_lang("menu-help", lang), CallbackAction::Help)],
    ]);
    Screen::with_keyboard(t_lang("main-menu-title", lang), keyboard)
}

/// The single-coin picker
pub fn coin_picker_screen(lang: Option<&str>) -> Screen {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = PICKER_COINS
        .iter()
        .filter_map(|(id, name_key)| {
            let coin = CoinId::new(id)?;
            Some(vec![button(t_lang(name_key, lang), CallbackAction::CoinPrice(coin))])
        })
        .collect();

    rows.push(vec![button(t_lang("search-other-button", lang), CallbackAction::SearchCoin)]);
    rows.push(back_to_menu_row(lang));

    Screen::with_keyboard(t_lang("picker-title", lang), InlineKeyboardMarkup::new(rows))
}

/// Price of a single coin with refresh / compare / back buttons
pub fn coin_price_screen(coin: &CoinId, price: f64, origin: PriceOrigin, lang: Option<&str>) -> Screen {
    let text = format!(
        "{}\n\n{}",
        t_args_lang("price-title", &[("coin", escape(&coin.capitalized()).as_str())], lang),
        t_args_lang("price-amount", &[("price", format_usd(price).as_str())], lang)
    );

    let mut rows = Vec::new();
    // Ids that cannot travel in callback data only get the back button
    if fits_callback_data(coin) {
        let refresh_key = match origin {
            PriceOrigin::Picker => "refresh-price-button",
            PriceOrigin::Search => "refresh-button",
        };
        rows.push(vec![button(t_lang(refresh_key, lang), CallbackAction::CoinPrice(coin.clone()))]);
        rows.push(vec![button(
            t_lang("compare-with-button", lang),
            CallbackAction::CompareWith(coin.clone()),
        )]);
    }
    rows.push(match origin {
        PriceOrigin::Picker => vec![button(t_lang("back-to-list-button", lang), CallbackAction::PriceSingle)],
        PriceOrigin::Search => back_to_menu_row(lang),
    });

    Screen::with_keyboard(text, InlineKeyboardMarkup::new(rows))
}

/// Price lookup from a picker button failed
pub fn coin_price_failed_screen(coin: &CoinId, lang: Option<&str>) -> Screen {
    Screen::text(format!(
        "{}\n{}",
        t_args_lang("price-failed", &[("coin", escape(coin.as_str()).as_str())], lang),
        t_lang("price-failed-hint", lang)
    ))
}

/// Free-text search found no price
pub fn search_not_found_screen(coin: &CoinId, lang: Option<&str>) -> Screen {
    Screen::text(format!(
        "{}\n{}\n\n{}",
        t_args_lang("search-not-found", &[("coin", escape(coin.as_str()).as_str())], lang),
        t_lang("search-not-found-hint", lang),
        t_lang("search-retry", lang)
    ))
}

/// Render the popular prices screen, fetching every coin in order
pub async fn popular_prices_screen(prices: &dyn PriceSource, lang: Option<&str>) -> Screen {
    let mut text = format!("{}\n\n", t_lang("popular-title", lang));

    for (id, symbol) in POPULAR_COINS {
        let price = match CoinId::new(id) {
            Some(coin) => displayable_price(prices.usd_price(&coin).await),
            None => None,
        };
        let value = match price {
            Some(price) => format!("${}", format_usd(price)),
            None => t_lang("popular-unknown", lang),
        };
        text.push_str(&format!("• <b>{symbol}</b>: {value}\n"));
    }

    text.push('\n');
    text.push_str(&t_lang("popular-updated", lang));

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![button(t_lang("popular-refresh-button", lang), CallbackAction::PopularPrices)],
        back_to_menu_row(lang),
    ]);
    Screen::with_keyboard(text, keyboard)
}

pub fn help_screen(lang: Option<&str>) -> Screen {
    let text = [
        t_lang("help-title", lang),
        [
            "help-commands-title",
            "help-command-start",
            "help-command-help",
            "help-command-cancel",
        ]
        .map(|key| t_lang(key, lang))
        .join("\n"),
        [
            "help-features-title",
            "help-feature-price",
            "help-feature-compare",
            "help-feature-popular",
        ]
        .map(|key| t_lang(key, lang))
        .join("\n"),
        [
            "help-notes-title",
            "help-note-usd",
            "help-note-source",
            "help-note-english",
        ]
        .map(|key| t_lang(key, lang))
        .join("\n"),
        t_lang("help-membership", lang),
    ]
    .join("\n\n");

    Screen::with_keyboard(text, InlineKeyboardMarkup::new(vec![back_to_menu_row(lang)]))
}

pub fn search_prompt_screen(lang: Option<&str>) -> Screen {
    Screen::text(format!(
        "{}\n\n{}\n\n{}",
        t_lang("search-prompt", lang),
        t_lang("search-example", lang),
        t_lang("cancel-hint", lang)
    ))
}

pub fn compare_prompt_screen(lang: Option<&str>) -> Screen {
    Screen::text(format!(
        "{}\n\n{}\n{}\n{}\n\n{}\n\n{}",
        t_lang("compare-prompt", lang),
        t_lang("compare-examples", lang),
        t_lang("compare-example-one", lang),
        t_lang("compare-example-two", lang),
        t_lang("compare-english-hint", lang),
        t_lang("compare-cancel-hint", lang)
    ))
}

/// Prompt shown after "compare with" on a coin price screen
pub fn compare_with_prompt_screen(base: &CoinId, lang: Option<&str>) -> Screen {
    Screen::text(format!(
        "{}\n\n{}\n{}\n\n{}",
        t_args_lang("compare-with-prompt", &[("coin", escape(&base.upper()).as_str())], lang),
        t_lang("compare-with-second", lang),
        t_lang("compare-with-example", lang),
        t_lang("cancel-hint", lang)
    ))
}

pub fn compare_need_two_screen(lang: Option<&str>) -> Screen {
    Screen::text(format!(
        "{}\n{}\n\n{}",
        t_lang("compare-need-two", lang),
        t_lang("compare-need-two-example", lang),
        t_lang("cancel-hint", lang)
    ))
}

pub fn compare_fetching_screen(lang: Option<&str>) -> Screen {
    Screen::text(t_lang("compare-fetching", lang))
}

/// Lists every coin whose price could not be fetched
pub fn compare_failed_screen(missing: &[CoinId], lang: Option<&str>) -> Screen {
    let mut text = format!("{}\n", t_lang("compare-failed", lang));
    for coin in missing {
        text.push_str(&format!("• <code>{}</code>\n", escape(coin.as_str())));
    }
    text.push_str(&format!(
        "\n{}\n\n{}",
        t_lang("compare-failed-hint", lang),
        t_lang("compare-failed-retry", lang)
    ));
    Screen::text(text)
}

pub fn compare_result_screen(comparison: &PriceComparison, lang: Option<&str>) -> Screen {
    let first = escape(&comparison.first.upper());
    let second = escape(&comparison.second.upper());

    let text = format!(
        "{}\n\n\
         • <b>{first}</b>: ${}\n\
         • <b>{second}</b>: ${}\n\n\
         {}\n\
         1 {first} = {} {second}\n\
         1 {second} = {} {first}\n\n\
         {}",
        t_lang("compare-title", lang),
        format_usd(comparison.first_price),
        format_usd(comparison.second_price),
        t_lang("compare-ratio-title", lang),
        format_ratio(comparison.ratio()),
        format_ratio(comparison.reciprocal()),
        t_lang("compare-new-hint", lang)
    );

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![button(t_lang("compare-again-button", lang), CallbackAction::PriceCompare)],
        back_to_menu_row(lang),
    ]);
    Screen::with_keyboard(text, keyboard)
}

pub fn cancelled_screen(was_comparing: bool, lang: Option<&str>) -> Screen {
    let key = if was_comparing {
        "compare-cancelled"
    } else {
        "operation-cancelled"
    };
    Screen::text(t_lang(key, lang))
}
