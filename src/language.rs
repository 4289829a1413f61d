use log::debug;

/// Language assumed when detection fails or the text is too thin to judge.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Only this many characters are fed to the detector.
pub const DETECTION_PREFIX_CHARS: usize = 500;

/// Guesses the language of a piece of text.
pub trait LanguageDetector: Send + Sync {
    /// Returns a two-letter code, or `None` when no confident guess exists.
    fn detect(&self, text: &str) -> Option<String>;
}

/// Detector backed by the `whatlang` trigram models.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        if !info.is_reliable() {
            debug!(
                "unreliable language guess {} ({:.2})",
                info.lang().code(),
                info.confidence()
            );
            return None;
        }
        iso_639_1(info.lang().code()).map(str::to_string)
    }
}

/// Maps whatlang's ISO 639-3 codes to the two-letter codes used for templates.
fn iso_639_1(code: &str) -> Option<&'static str> {
    let short = match code {
        "eng" => "en",
        "spa" => "es",
        "rus" => "ru",
        "ukr" => "uk",
        "por" => "pt",
        "fra" => "fr",
        "deu" => "de",
        "ita" => "it",
        "nld" => "nl",
        "pol" => "pl",
        "tur" => "tr",
        "jpn" => "ja",
        "kor" => "ko",
        "cmn" => "zh",
        "ara" => "ar",
        "hin" => "hi",
        _ => return None,
    };
    Some(short)
}

/// Runs `detector` over the first [`DETECTION_PREFIX_CHARS`] characters of
/// `text` and falls back to [`DEFAULT_LANGUAGE`].
pub fn detect_or_default(detector: &dyn LanguageDetector, text: &str) -> String {
    let prefix: String = text.chars().take(DETECTION_PREFIX_CHARS).collect();
    if prefix.trim().is_empty() {
        return DEFAULT_LANGUAGE.to_string();
    }
    detector
        .detect(&prefix)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}
