//! # Localization Tests
//!
//! Message retrieval, argument substitution and language fallback.

use coin_price_bot::localization::{t_args_lang, t_lang, LocalizationManager};
use std::collections::HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        LocalizationManager::new().expect("Failed to create localization manager")
    }

    #[test]
    fn test_get_message_existing_key() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("help-commands-title", "en", None);
        assert!(message.contains("Main commands"));
    }

    #[test]
    fn test_get_message_nonexistent_key() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("nonexistent-key", "en", None);
        assert_eq!(message, "Missing translation: nonexistent-key");
    }

    #[test]
    fn test_get_message_unsupported_language() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("popular-unknown", "unsupported", None);
        assert_eq!(message, "unknown");
    }

    #[test]
    fn test_get_message_with_args() {
        let manager = setup_localization();

        let mut args = HashMap::new();
        args.insert("coin", "Bitcoin");

        let message = manager.get_message_in_language("price-title", "en", Some(&args));
        assert_eq!(message, "💰 <b>Bitcoin price</b>");
    }

    #[test]
    fn test_no_isolation_marks_around_arguments() {
        let message = t_args_lang("price-amount", &[("price", "1,234.50")], Some("fa"));
        assert_eq!(message, "📊 <b>$1,234.50</b> USD");
        assert!(!message.contains('\u{2068}'));
    }

    #[test]
    fn test_every_english_key_translated_to_persian() {
        let en = include_str!("../locales/en/main.ftl");
        let fa = include_str!("../locales/fa/main.ftl");

        let keys = |source: &'static str| -> Vec<&'static str> {
            source
                .lines()
                .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
                .filter_map(|line| line.split_once(" = ").map(|(key, _)| key))
                .collect()
        };

        assert_eq!(keys(en), keys(fa));
    }

    #[test]
    fn test_t_lang_fallback() {
        assert_eq!(t_lang("popular-unknown", Some("fa")), "نامعلوم");
        assert_eq!(t_lang("popular-unknown", Some("ja")), "unknown");
        assert_eq!(t_lang("popular-unknown", None), "unknown");
    }
}
