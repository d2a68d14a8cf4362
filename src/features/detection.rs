// Language detection for incoming messages

use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use once_cell::sync::Lazy;

/// Returned when no language could be determined
pub const UNKNOWN_LANGUAGE: &str = "unknown";

const DETECTABLE: [Language; 15] = [
    Language::Arabic,
    Language::Chinese,
    Language::Dutch,
    Language::English,
    Language::French,
    Language::German,
    Language::Italian,
    Language::Japanese,
    Language::Korean,
    Language::Polish,
    Language::Portuguese,
    Language::Russian,
    Language::Spanish,
    Language::Turkish,
    Language::Ukrainian,
];

static DETECTOR: Lazy<LanguageDetector> =
    Lazy::new(|| LanguageDetectorBuilder::from_languages(&DETECTABLE).build());

/// Best-guess ISO 639-1 code for the text, or `unknown`
pub fn detect_language(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return UNKNOWN_LANGUAGE.to_string();
    }

    DETECTOR
        .detect_language_of(text)
        .map(|lang| lang.iso_code_639_1().to_string().to_lowercase())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_unknown() {
        assert_eq!(detect_language(""), UNKNOWN_LANGUAGE);
        assert_eq!(detect_language("   "), UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_detects_common_languages() {
        assert_eq!(
            detect_language("The weather is lovely today and I am going for a walk in the park."),
            "en"
        );
        assert_eq!(
            detect_language("Bonjour à tous, je suis très content de vous voir aujourd'hui."),
            "fr"
        );
        assert_eq!(
            detect_language("Привет всем, как у вас дела сегодня вечером?"),
            "ru"
        );
    }
}
