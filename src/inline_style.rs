//! Inline `style="..."` attribute parsing.

use crate::style::{parse_decimal, StyleDict, StyleValue};

/// Parse an inline style attribute into a [`StyleDict`].
///
/// Declarations are `;`-separated `name: value` pairs. Names are converted from
/// kebab-case to camelCase (`font-size` becomes `fontSize`), `!important` is
/// dropped, and bare numbers or `px` lengths become numbers. Other values are
/// kept as text for the normalizer. Malformed declarations are skipped, so an
/// empty or garbage attribute yields an empty dictionary.
pub fn parse_inline_style(attr: &str) -> StyleDict {
    let mut style = StyleDict::new();
    for declaration in attr.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            continue;
        }
        let value = strip_important(value.trim());
        if value.is_empty() {
            continue;
        }
        style.insert(camel_case_property(name), parse_value(value));
    }
    style
}

fn strip_important(value: &str) -> &str {
    match value.rfind('!') {
        Some(idx) if value[idx + 1..].trim().eq_ignore_ascii_case("important") => {
            value[..idx].trim_end()
        }
        _ => value,
    }
}

/// `font-size` -> `fontSize`; vendor prefixes keep their leading capital
/// (`-webkit-box` -> `WebkitBox`).
pub fn camel_case_property(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch.to_ascii_lowercase());
        }
    }
    out
}

fn parse_value(value: &str) -> StyleValue {
    let number = value.strip_suffix("px").unwrap_or(value);
    match parse_decimal(number) {
        Some(n) => StyleValue::Number(n),
        None => StyleValue::Text(value.to_string()),
    }
}
