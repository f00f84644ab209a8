//! Style dictionaries and the unit normalizer.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::fmt;

use serde::{Deserialize, Serialize};

/// Property key for font size.
pub const FONT_SIZE: &str = "fontSize";
/// Property key for line height.
pub const LINE_HEIGHT: &str = "lineHeight";

/// Font size above which a line height is injected when none was given.
pub const LARGE_FONT_THRESHOLD: f32 = 23.0;
/// Extra line height added on top of a large font size.
pub const LARGE_FONT_LINE_GAP: f32 = 4.0;

/// A single style property value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// Absolute number (device-independent units for lengths).
    Number(f32),
    /// Keyword or unit-suffixed string.
    Text(String),
}

impl StyleValue {
    /// Numeric payload, if any.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Mapping from camelCase property name to value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleDict {
    entries: BTreeMap<String, StyleValue>,
}

impl StyleDict {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up a property.
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.get(key)
    }

    /// Whether a property is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay `other` onto `self`; keys in `other` win.
    pub fn merge(&mut self, other: &StyleDict) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = StyleDict::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

/// Tag name to default style.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagStyleTable {
    styles: BTreeMap<String, StyleDict>,
}

impl TagStyleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Conventional browser-like defaults for inline and heading tags.
    pub fn html_defaults() -> Self {
        let bold = || StyleDict::new().with("fontWeight", "bold");
        let italic = || StyleDict::new().with("fontStyle", "italic");
        let mono = || StyleDict::new().with("fontFamily", "monospace");
        let heading = |size: &str| {
            StyleDict::new()
                .with(FONT_SIZE, size)
                .with("fontWeight", "bold")
        };

        let mut table = Self::new();
        for tag in ["b", "strong", "th"] {
            table.insert(tag, bold());
        }
        for tag in ["i", "em", "cite", "var"] {
            table.insert(tag, italic());
        }
        for tag in ["u", "ins"] {
            table.insert(tag, StyleDict::new().with("textDecorationLine", "underline"));
        }
        for tag in ["s", "strike", "del"] {
            table.insert(
                tag,
                StyleDict::new().with("textDecorationLine", "line-through"),
            );
        }
        for tag in ["code", "kbd", "samp", "pre"] {
            table.insert(tag, mono());
        }
        table.insert("h1", heading("2em"));
        table.insert("h2", heading("1.5em"));
        table.insert("h3", heading("1.17em"));
        table.insert("h4", heading("1em"));
        table.insert("h5", heading("0.83em"));
        table.insert("h6", heading("0.67em"));
        table.insert("small", StyleDict::new().with(FONT_SIZE, "0.8em"));
        table.insert(
            "a",
            StyleDict::new()
                .with("color", "#0645ad")
                .with("textDecorationLine", "underline"),
        );
        table
    }

    /// Set the default style for a tag (tag names are lower-cased).
    pub fn insert(&mut self, tag: &str, style: StyleDict) {
        self.styles.insert(tag.to_ascii_lowercase(), style);
    }

    /// Default style for a tag.
    pub fn get(&self, tag: &str) -> Option<&StyleDict> {
        self.styles.get(tag)
    }

    /// Overlay another table; its entries replace whole per-tag styles.
    pub fn extend(&mut self, other: TagStyleTable) {
        self.styles.extend(other.styles);
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Result of [`normalize_styles`].
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedStyle {
    /// Font size descendants resolve relative units against.
    pub effective_font_size: f32,
    /// Merged style with relative units resolved.
    pub style: StyleDict,
}

/// Merge `styles` outer-to-inner and resolve `em`/`pt` values.
///
/// Absent entries are skipped. `em` values scale by `base_font_size`, `pt`
/// values become bare numbers. A resolved `fontSize` above
/// [`LARGE_FONT_THRESHOLD`] gets `lineHeight = fontSize + 4` unless one of the
/// inputs set `lineHeight` itself.
pub fn normalize_styles(base_font_size: f32, styles: &[Option<&StyleDict>]) -> NormalizedStyle {
    let mut merged = StyleDict::new();
    let mut explicit_line_height = false;
    for style in styles.iter().flatten() {
        explicit_line_height |= style.contains_key(LINE_HEIGHT);
        merged.merge(style);
    }

    for value in merged.entries.values_mut() {
        let resolved = match value {
            StyleValue::Text(text) => resolve_unit(text, base_font_size),
            StyleValue::Number(_) => None,
        };
        if let Some(number) = resolved {
            *value = StyleValue::Number(number);
        }
    }

    let font_size = merged.get(FONT_SIZE).and_then(StyleValue::as_number);
    if let Some(size) = font_size {
        if size > LARGE_FONT_THRESHOLD && !explicit_line_height {
            merged.insert(LINE_HEIGHT, size + LARGE_FONT_LINE_GAP);
        }
    }

    NormalizedStyle {
        effective_font_size: font_size.unwrap_or(base_font_size),
        style: merged,
    }
}

fn resolve_unit(value: &str, base_font_size: f32) -> Option<f32> {
    if let Some(number) = value.strip_suffix("em") {
        return parse_decimal(number).map(|em| em * base_font_size);
    }
    if let Some(number) = value.strip_suffix("pt") {
        return parse_decimal(number);
    }
    None
}

/// Parse `[+-]?(digits[.digits]|.digits)`; exponents, `inf`, `nan` and
/// surrounding whitespace are rejected.
pub(crate) fn parse_decimal(raw: &str) -> Option<f32> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let valid = match frac_part {
        Some(frac) => {
            digits(int_part) && digits(frac) && (!int_part.is_empty() || !frac.is_empty())
        }
        None => !int_part.is_empty() && digits(int_part),
    };
    if !valid {
        return None;
    }
    raw.parse::<f32>().ok()
}
