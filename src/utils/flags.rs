// Flag <-> language registry
// Codes are the ones the translation backend expects

pub struct Flag {
    pub emoji: &'static str,
    pub lang: &'static str,
    pub name: &'static str,
}

/// Every flag the bot understands, in reaction order
pub const FLAGS: &[Flag] = &[
    Flag { emoji: "🇬🇧", lang: "en", name: "English" },
    Flag { emoji: "🇷🇺", lang: "ru", name: "Russian" },
    Flag { emoji: "🇺🇦", lang: "uk", name: "Ukrainian" },
    Flag { emoji: "🇩🇪", lang: "de", name: "German" },
    Flag { emoji: "🇫🇷", lang: "fr", name: "French" },
    Flag { emoji: "🇪🇸", lang: "es", name: "Spanish" },
    Flag { emoji: "🇮🇹", lang: "it", name: "Italian" },
    Flag { emoji: "🇵🇹", lang: "pt", name: "Portuguese" },
    Flag { emoji: "🇵🇱", lang: "pl", name: "Polish" },
    Flag { emoji: "🇳🇱", lang: "nl", name: "Dutch" },
    Flag { emoji: "🇹🇷", lang: "tr", name: "Turkish" },
    Flag { emoji: "🇸🇦", lang: "ar", name: "Arabic" },
    Flag { emoji: "🇯🇵", lang: "ja", name: "Japanese" },
    Flag { emoji: "🇰🇷", lang: "ko", name: "Korean" },
    Flag { emoji: "🇨🇳", lang: "zh-CN", name: "Chinese" },
];

/// Flags applied when a guild has not configured its own languages
pub const QUICK_TRANSLATE_FLAGS: &[&str] = &["🇬🇧", "🇷🇺", "🇺🇦"];

pub fn flag_to_lang(emoji: &str) -> Option<&'static str> {
    FLAGS.iter().find(|f| f.emoji == emoji).map(|f| f.lang)
}

pub fn lang_to_flag(lang: &str) -> Option<&'static str> {
    FLAGS
        .iter()
        .find(|f| same_language(f.lang, lang))
        .map(|f| f.emoji)
}

/// Languages behind the quick-translate flags
pub fn default_languages() -> Vec<String> {
    QUICK_TRANSLATE_FLAGS
        .iter()
        .filter_map(|flag| flag_to_lang(flag))
        .map(str::to_string)
        .collect()
}

/// Compare two language codes on their primary subtag ("zh-CN" == "zh")
pub fn same_language(a: &str, b: &str) -> bool {
    fn primary(code: &str) -> &str {
        code.split(['-', '_']).next().unwrap_or(code)
    }
    primary(a).eq_ignore_ascii_case(primary(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_bidirectional() {
        for flag in FLAGS {
            assert_eq!(flag_to_lang(flag.emoji), Some(flag.lang));
            assert_eq!(lang_to_flag(flag.lang), Some(flag.emoji));
        }
    }

    #[test]
    fn test_quick_flags_are_registered() {
        for flag in QUICK_TRANSLATE_FLAGS {
            assert!(flag_to_lang(flag).is_some(), "{flag} missing from FLAGS");
        }
        assert_eq!(default_languages(), vec!["en", "ru", "uk"]);
    }

    #[test]
    fn test_same_language() {
        assert!(same_language("zh-CN", "zh"));
        assert!(same_language("EN", "en"));
        assert!(!same_language("en", "ru"));
        assert_eq!(flag_to_lang("👍"), None);
    }
}
