//! Entity and intent extraction
//!
//! Turns free text into an [`ExtractionResult`]: a candidate place name plus
//! weather/places intent flags. Place names come from an injected
//! [`EntityRecognizer`] first and from a capitalization heuristic second.

use std::sync::Arc;

use tracing::debug;

use crate::config::IntentsConfig;
use crate::models::ExtractionResult;

/// Label attached to a recognized span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    /// Geopolitical entity (city, region, country)
    Gpe,
    /// Non-political location (mountain, lake, landmark)
    Loc,
    Person,
    Org,
    Misc,
}

impl EntityLabel {
    /// Whether spans with this label can name a place
    #[must_use]
    pub fn is_location(self) -> bool {
        matches!(self, EntityLabel::Gpe | EntityLabel::Loc)
    }
}

/// A substring of the input tagged by a recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    /// Byte offset of the span in the input
    pub start: usize,
}

/// Anything that maps text to tagged spans, ordered by position in the text.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<EntitySpan>;
}

/// Words that usually precede a place name
const LOCATION_CUES: &[&str] = &[
    "in", "near", "to", "at", "around", "from", "about", "for", "of", "visit", "visiting",
    "explore",
];

fn is_cue(token: &Token<'_>) -> bool {
    LOCATION_CUES.contains(&token.word.to_lowercase().as_str())
}

/// Lightweight recognizer: gazetteer matches plus capitalized runs after a location cue.
///
/// A run never contains a cue word or a stopword, so "going to Rain in Paris"
/// yields only `Paris`.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedRecognizer {
    gazetteer: Vec<Vec<String>>,
    stopwords: Vec<String>,
}

impl RuleBasedRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names that are always tagged as locations, matched case-insensitively on whole words
    #[must_use]
    pub fn with_gazetteer<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.gazetteer = names
            .into_iter()
            .map(|name| {
                name.as_ref()
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
            })
            .filter(|words| !words.is_empty())
            .collect();
        self
    }

    /// Words that are never part of a place name even when capitalized
    #[must_use]
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        self
    }

    fn is_stopword(&self, token: &Token<'_>) -> bool {
        let word = token.word.to_lowercase();
        self.stopwords.iter().any(|stop| *stop == word)
    }

    fn gazetteer_spans(&self, tokens: &[Token<'_>], text: &str) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        for entry in &self.gazetteer {
            for window_start in 0..tokens.len() {
                let window = tokens.iter().skip(window_start).take(entry.len());
                let matched = window.clone().count() == entry.len()
                    && window
                        .zip(entry)
                        .all(|(token, word)| token.word.to_lowercase() == *word);
                if matched {
                    let first = &tokens[window_start];
                    let last = &tokens[window_start + entry.len() - 1];
                    spans.push(EntitySpan {
                        text: text[first.start..last.end].to_string(),
                        label: EntityLabel::Loc,
                        start: first.start,
                    });
                }
            }
        }
        spans
    }

    fn cue_spans(&self, tokens: &[Token<'_>], text: &str) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if !is_cue(&tokens[i]) {
                i += 1;
                continue;
            }

            let run_start = i + 1;
            let mut run_end = run_start;
            while run_end < tokens.len()
                && tokens[run_end].is_capitalized()
                && !is_cue(&tokens[run_end])
                && !self.is_stopword(&tokens[run_end])
            {
                run_end += 1;
                // "Paris, France" stops at the comma
                if tokens[run_end - 1].closes_phrase {
                    break;
                }
            }

            if run_end > run_start {
                let first = &tokens[run_start];
                let last = &tokens[run_end - 1];
                spans.push(EntitySpan {
                    text: text[first.start..last.end].to_string(),
                    label: EntityLabel::Gpe,
                    start: first.start,
                });
            }
            i = run_end.max(i + 1);
        }
        spans
    }
}

impl EntityRecognizer for RuleBasedRecognizer {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        let tokens = tokenize(text);
        let mut spans = self.gazetteer_spans(&tokens, text);
        spans.extend(self.cue_spans(&tokens, text));
        spans.sort_by_key(|span| span.start);
        spans.dedup_by_key(|span| span.start);
        spans
    }
}

/// A whitespace token with edge punctuation trimmed
#[derive(Debug)]
struct Token<'a> {
    word: &'a str,
    start: usize,
    end: usize,
    closes_phrase: bool,
}

impl Token<'_> {
    fn is_capitalized(&self) -> bool {
        self.word.chars().next().is_some_and(char::is_uppercase)
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut offset = 0;
    for raw in text.split_whitespace() {
        let Some(found) = text[offset..].find(raw) else {
            continue;
        };
        let raw_start = offset + found;
        offset = raw_start + raw.len();

        let trimmed_front = raw.trim_start_matches(is_edge_punctuation);
        let word = trimmed_front.trim_end_matches(is_edge_punctuation);
        if word.is_empty() {
            continue;
        }
        let start = raw_start + (raw.len() - trimmed_front.len());
        tokens.push(Token {
            word,
            start,
            end: start + word.len(),
            closes_phrase: raw.ends_with([',', '.', '?', '!', ';', ':']),
        });
    }
    tokens
}

fn is_edge_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() && c != '-' && c != '\''
}

/// Extracts a place name and intents from a query
#[derive(Clone)]
pub struct Extractor {
    recognizer: Arc<dyn EntityRecognizer>,
    weather_keywords: Vec<String>,
    places_keywords: Vec<String>,
}

impl Extractor {
    /// Create an extractor with explicit keyword sets
    pub fn new(
        recognizer: Arc<dyn EntityRecognizer>,
        weather_keywords: Vec<String>,
        places_keywords: Vec<String>,
    ) -> Self {
        Self {
            recognizer,
            weather_keywords: normalize_keywords(weather_keywords),
            places_keywords: normalize_keywords(places_keywords),
        }
    }

    /// Create an extractor backed by the rule-based recognizer
    #[must_use]
    pub fn from_config(config: &IntentsConfig) -> Self {
        let recognizer = RuleBasedRecognizer::new()
            .with_gazetteer(&config.gazetteer)
            .with_stopwords(
                config
                    .weather_keywords
                    .iter()
                    .chain(&config.places_keywords),
            );
        Self::new(
            Arc::new(recognizer),
            config.weather_keywords.clone(),
            config.places_keywords.clone(),
        )
    }

    /// Derive place and intents from raw text
    #[must_use]
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let place = self.extract_place(text);
        let (wants_weather, wants_places) = self.extract_intents(text);
        let result = ExtractionResult::new(place, wants_weather, wants_places);
        debug!(
            place = ?result.place,
            wants_weather = result.wants_weather,
            wants_places = result.wants_places,
            "Extracted query"
        );
        result
    }

    /// First location-tagged span, else the first capitalized token
    #[must_use]
    pub fn extract_place(&self, text: &str) -> Option<String> {
        let recognized = self
            .recognizer
            .recognize(text)
            .into_iter()
            .find(|span| span.label.is_location())
            .map(|span| span.text)
            .filter(|name| !name.trim().is_empty());

        if recognized.is_some() {
            return recognized;
        }

        tokenize(text)
            .into_iter()
            .find(Token::is_capitalized)
            .map(|token| token.word.to_string())
    }

    /// Case-insensitive keyword matching; returns `(wants_weather, wants_places)` before defaulting
    #[must_use]
    pub fn extract_intents(&self, text: &str) -> (bool, bool) {
        let lower = text.to_lowercase();
        (
            contains_any(&lower, &self.weather_keywords),
            contains_any(&lower, &self.places_keywords),
        )
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::from_config(&IntentsConfig::default())
    }
}

fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn contains_any(input: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| input.contains(needle.as_str()))
}
