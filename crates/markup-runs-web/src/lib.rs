//! HTML preview host for `markup-runs`.
//!
//! Renders a fragment tree the way a single inline text primitive would show
//! it: one `white-space: pre-wrap` container holding nested spans.

use markup_runs::{RenderFragment, StyleDict, StyleValue};

/// Properties whose numeric values are unitless in CSS.
const UNITLESS: &[&str] = &[
    "fontWeight",
    "opacity",
    "zIndex",
    "flex",
    "flexGrow",
    "flexShrink",
    "order",
];

/// Render fragments as nested inline HTML inside a `pre-wrap` container.
pub fn fragments_to_html(fragments: &[RenderFragment]) -> String {
    let mut out = String::with_capacity(256);
    out.push_str("<div class=\"markup-runs\" style=\"white-space: pre-wrap\">");
    push_fragments(fragments, &mut out);
    out.push_str("</div>");
    out
}

fn push_fragments(fragments: &[RenderFragment], out: &mut String) {
    for fragment in fragments {
        match fragment {
            RenderFragment::Text(text) => push_escaped(text, out),
            RenderFragment::Group { children } => push_fragments(children, out),
            RenderFragment::Styled(run) => {
                let tag = match &run.activation {
                    Some(activation) => {
                        out.push_str("<a href=\"");
                        push_escaped(activation.target(), out);
                        out.push('"');
                        "a"
                    }
                    None => {
                        out.push_str("<span");
                        "span"
                    }
                };
                if !run.style.is_empty() {
                    out.push_str(" style=\"");
                    push_escaped(&style_to_css(&run.style), out);
                    out.push('"');
                }
                out.push('>');
                push_fragments(&run.children, out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

/// Serialize a style dictionary as a CSS declaration list.
pub fn style_to_css(style: &StyleDict) -> String {
    style
        .iter()
        .map(|(key, value)| {
            let value = match value {
                StyleValue::Number(n) if UNITLESS.contains(&key) => format!("{}", n),
                StyleValue::Number(n) => format!("{}px", n),
                StyleValue::Text(text) => text.clone(),
            };
            format!("{}: {}", kebab_case_property(key), value)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// `fontSize` -> `font-size`; a leading capital marks a vendor prefix
/// (`WebkitBox` -> `-webkit-box`).
pub fn kebab_case_property(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn push_escaped(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Standalone preview document with the rendered markup and the raw fragment
/// JSON for inspection.
pub fn preview_page(
    title: &str,
    fragments: &[RenderFragment],
) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(fragments)?;
    let mut page = String::with_capacity(1024 + json.len());
    page.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>");
    push_escaped(title, &mut page);
    page.push_str("</title>\n<style>\n");
    page.push_str(
        "body { font: 16px/1.4 serif; margin: 24px; max-width: 720px; }\n\
         .markup-runs { border: 1px solid #ccc; padding: 12px; }\n\
         pre.fragments { font-size: 12px; background: #f6f6f6; padding: 12px; }\n",
    );
    page.push_str("</style>\n</head>\n<body>\n");
    page.push_str(&fragments_to_html(fragments));
    page.push_str("\n<h2>Fragments</h2>\n<pre class=\"fragments\" id=\"fragments\">");
    push_escaped(&json, &mut page);
    page.push_str("</pre>\n</body>\n</html>\n");
    log::debug!("Built preview page ({} bytes)", page.len());
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup_runs::{MarkupRenderer, RenderOptions};

    #[test]
    fn kebab_case_round_trips_common_properties() {
        assert_eq!(kebab_case_property("fontSize"), "font-size");
        assert_eq!(kebab_case_property("textDecorationLine"), "text-decoration-line");
        assert_eq!(kebab_case_property("WebkitTextStroke"), "-webkit-text-stroke");
    }

    #[test]
    fn numbers_get_px_except_unitless() {
        let style = StyleDict::new()
            .with("fontSize", 32.0f32)
            .with("fontWeight", 700.0f32)
            .with("color", "red");
        assert_eq!(style_to_css(&style), "color: red; font-size: 32px; font-weight: 700");
    }

    #[test]
    fn renders_nested_spans_and_escapes_text() {
        let renderer = MarkupRenderer::new(RenderOptions::default());
        let rendered = renderer
            .render("<p>a &lt;b&gt; <b>bold</b></p>")
            .expect("render");
        assert_eq!(
            fragments_to_html(rendered.fragments()),
            "<div class=\"markup-runs\" style=\"white-space: pre-wrap\">a &lt;b&gt; \
             <span style=\"font-weight: bold\">bold</span>\n</div>"
        );
    }

    #[test]
    fn preview_page_embeds_fragment_json() {
        let fragments = vec![RenderFragment::text("</pre>")];
        let page = preview_page("T & U", &fragments).expect("page");
        assert!(page.contains("<title>T &amp; U</title>"));
        assert!(page.contains("&lt;/pre&gt;"));
        assert!(!page.contains("\"</pre>"));
    }
}
