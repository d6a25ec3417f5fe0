//! Match: one recognizer hypothesis for a user utterance
//!
//! Some platforms only ever report a single match with a fixed probability,
//! others return a ranked list. Every setter here is fail-soft: a value that
//! does not satisfy the field's rule degrades to the field's default instead
//! of producing an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Probability used when the recognizer does not report a usable one
pub const DEFAULT_MATCH_PROBABILITY: f64 = 1.0;

/// A recognized slot/entity value attached to a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedValue {
    pub key: String,
    pub value: Value,
}

impl MappedValue {
    /// Create a mapped value
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Read an entry shaped like `{"key": "...", "value": ...}`.
    ///
    /// Returns `None` when `key` is not a string or `value` is missing.
    pub fn from_value(entry: &Value) -> Option<Self> {
        let key = entry.get("key")?.as_str()?;
        let value = entry.get("value")?;
        Some(Self::new(key, value.clone()))
    }
}

/// One candidate interpretation of an utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Match {
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_text: Option<String>,
    match_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    intent_name: Option<String>,
    mapped_values: Vec<MappedValue>,
    locales: Vec<String>,
}

impl Default for Match {
    fn default() -> Self {
        Self {
            raw_text: None,
            match_probability: DEFAULT_MATCH_PROBABILITY,
            intent_name: None,
            mapped_values: Vec::new(),
            locales: Vec::new(),
        }
    }
}

impl Match {
    /// Create a match, running every field through its setter
    pub fn new<L>(
        raw_text: Option<String>,
        match_probability: f64,
        intent_name: Option<String>,
        mapped_values: Vec<MappedValue>,
        locales: L,
    ) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let mut m = Self::default();
        m.set_raw_text(raw_text);
        m.set_match_probability(match_probability);
        m.set_intent_name(intent_name);
        m.set_mapped_values(mapped_values);
        m.set_locales(locales);
        m
    }

    /// Create a new builder
    pub fn builder() -> MatchBuilder {
        MatchBuilder::default()
    }

    /// Build a match from loosely typed JSON (`rawText`, `matchProbability`,
    /// `intentName`, `mappedValues`, `locales`).
    pub fn from_value(value: &Value) -> Self {
        let null = Value::Null;
        let field = |name: &str| value.get(name).unwrap_or(&null);

        let mut m = Self::default();
        m.set_raw_text(field("rawText").as_str().map(str::to_string));
        m.set_match_probability_value(field("matchProbability"));
        m.set_intent_name(field("intentName").as_str().map(str::to_string));
        m.set_mapped_values_value(field("mappedValues"));
        m.set_locales_value(field("locales"));
        m
    }

    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn set_raw_text(&mut self, raw_text: Option<String>) {
        self.raw_text = raw_text;
    }

    pub fn match_probability(&self) -> f64 {
        self.match_probability
    }

    /// Store `probability` clamped to `[0.0, 1.0]`; NaN becomes 1.0
    pub fn set_match_probability(&mut self, probability: f64) {
        self.match_probability = if probability.is_nan() {
            debug!("match probability is NaN, using default");
            DEFAULT_MATCH_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
    }

    /// Same as [`Match::set_match_probability`], anything but a JSON number
    /// becomes 1.0
    pub fn set_match_probability_value(&mut self, probability: &Value) {
        match probability.as_f64() {
            Some(p) => self.set_match_probability(p),
            None => {
                if !probability.is_null() {
                    debug!(%probability, "match probability is not a number, using default");
                }
                self.match_probability = DEFAULT_MATCH_PROBABILITY;
            }
        }
    }

    pub fn intent_name(&self) -> Option<&str> {
        self.intent_name.as_deref()
    }

    pub fn set_intent_name(&mut self, intent_name: Option<String>) {
        self.intent_name = intent_name;
    }

    pub fn mapped_values(&self) -> &[MappedValue] {
        &self.mapped_values
    }

    /// Value of the first mapped entry with `key`
    pub fn mapped_value(&self, key: &str) -> Option<&Value> {
        self.mapped_values
            .iter()
            .find(|mapped| mapped.key == key)
            .map(|mapped| &mapped.value)
    }

    /// Replace all mapped values, keeping their order
    pub fn set_mapped_values(&mut self, mapped_values: impl IntoIterator<Item = MappedValue>) {
        self.mapped_values = mapped_values.into_iter().collect();
    }

    /// Replace all mapped values from a JSON array. Entries without a string
    /// `key` or without a `value` are dropped; a non-array clears the list.
    pub fn set_mapped_values_value(&mut self, mapped_values: &Value) {
        let Some(entries) = mapped_values.as_array() else {
            if !mapped_values.is_null() {
                debug!("mapped values are not an array, clearing");
            }
            self.mapped_values.clear();
            return;
        };

        self.mapped_values = entries
            .iter()
            .filter_map(MappedValue::from_value)
            .collect();

        let dropped = entries.len() - self.mapped_values.len();
        if dropped > 0 {
            debug!(dropped, "dropped malformed mapped values");
        }
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Replace the locales. Duplicates are dropped, first occurrence wins.
    pub fn set_locales<L>(&mut self, locales: L)
    where
        L: IntoIterator,
        L::Item: Into<String>,
    {
        self.locales.clear();
        for locale in locales {
            let locale = locale.into();
            if !self.locales.contains(&locale) {
                self.locales.push(locale);
            }
        }
    }

    /// Replace the locales from a JSON array of strings; other entries are
    /// ignored and a non-array clears the set.
    pub fn set_locales_value(&mut self, locales: &Value) {
        match locales.as_array() {
            Some(entries) => self.set_locales(entries.iter().filter_map(Value::as_str)),
            None => self.locales.clear(),
        }
    }
}

impl From<Value> for Match {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

/// Builder for [`Match`]
#[derive(Debug, Clone, Default)]
pub struct MatchBuilder {
    inner: Match,
}

impl MatchBuilder {
    pub fn raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.inner.set_raw_text(Some(raw_text.into()));
        self
    }

    pub fn probability(mut self, probability: f64) -> Self {
        self.inner.set_match_probability(probability);
        self
    }

    pub fn intent_name(mut self, intent_name: impl Into<String>) -> Self {
        self.inner.set_intent_name(Some(intent_name.into()));
        self
    }

    /// Append one mapped value
    pub fn mapped_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner.mapped_values.push(MappedValue::new(key, value));
        self
    }

    pub fn mapped_values(mut self, mapped_values: impl IntoIterator<Item = MappedValue>) -> Self {
        self.inner.set_mapped_values(mapped_values);
        self
    }

    pub fn locales<L>(mut self, locales: L) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
    {
        self.inner.set_locales(locales);
        self
    }

    pub fn build(self) -> Match {
        self.inner
    }
}
