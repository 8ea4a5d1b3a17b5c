use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::LazyLock;
use unic_langid::LanguageIdentifier;
use anyhow::{anyhow, Result};

/// Language used when the user's language is absent or unsupported
pub const DEFAULT_LANGUAGE: &str = "en";

/// Embedded Fluent resources: (language, source)
const RESOURCES: [(&str, &str); 2] = [
    ("en", include_str!("../locales/en/main.ftl")),
    ("fa", include_str!("../locales/fa/main.ftl")),
];

/// Localization manager for the Coin Price Bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every embedded language
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (language, source) in RESOURCES {
            let locale: LanguageIdentifier = language.parse()?;
            let bundle = Self::create_bundle(&locale, source)?;
            bundles.insert(language.to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Messages are sent as Telegram HTML; bidi isolation marks would leak into it
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid resource for {locale}: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate messages for {locale}: {errors:?}"))?;

        Ok(bundle)
    }

    /// Whether a language has its own bundle
    pub fn is_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }

    /// Get a localized message in a specific language, falling back to English
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {key}"),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (k, v) in args {
                fluent_args.set(*k, FluentValue::from(*v));
            }
            fluent_args
        });

        let mut errors = vec![];
        bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors)
            .into_owned()
    }
}

static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(|| {
    // Resources are embedded, so a failure here is a build defect rather than a runtime condition
    LocalizationManager::new().unwrap_or_else(|e| panic!("Embedded locales failed to load: {e}"))
});

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Map a Telegram language code (`fa`, `en-US`, ...) to a supported language
pub fn resolve_language(language_code: Option<&str>) -> &'static str {
    let primary = language_code
        .and_then(|code| code.split(['-', '_']).next())
        .map(|code| code.to_lowercase());

    match primary {
        Some(code) => RESOURCES
            .iter()
            .map(|(language, _)| *language)
            .find(|language| *language == code)
            .unwrap_or(DEFAULT_LANGUAGE),
        None => DEFAULT_LANGUAGE,
    }
}

/// Localized message for the user's language code
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    get_localization_manager().get_message_in_language(key, resolve_language(language_code), None)
}

/// Localized message with arguments for the user's language code
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
    get_localization_manager().get_message_in_language(
        key,
        resolve_language(language_code),
        Some(&args_map),
    )
}
