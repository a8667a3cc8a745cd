use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("number regex"));
static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year regex"));

const STRIPPED_PUNCTUATION: &[char] = &['¿', '?', '¡', '!', '.', ',', ';', ':'];

/// One incoming message, normalized once and reused by every matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub raw: String,
    pub normalized: String,
    pub numbers: Vec<u64>,
    pub year: Option<u16>,
}

impl Utterance {
    pub fn new(raw: &str) -> Self {
        let normalized = normalize_text(raw);
        let numbers = extract_numbers(&normalized);
        let year = extract_year(&normalized);
        Self {
            raw: raw.to_string(),
            normalized,
            numbers,
            year,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Lower-cases, strips diacritics and question/exclamation punctuation, and collapses
/// whitespace. Every pattern in `intent` is written against this form.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn extract_numbers(text: &str) -> Vec<u64> {
    NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .collect()
}

pub fn extract_year(text: &str) -> Option<u16> {
    YEAR_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<u16>().ok())
}

/// es-AR grouping: `1234567` -> `1.234.567`.
pub fn format_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}
