//! Rendered fragment tree and host-side flattening helpers.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::Serialize;

use crate::activation::Activation;
use crate::style::StyleDict;

/// Styled run wrapping child fragments.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyledRun {
    /// Normalized style applied to every descendant.
    pub style: StyleDict,
    /// Press handler for link fragments.
    #[serde(rename = "link", skip_serializing_if = "Option::is_none")]
    pub activation: Option<Activation>,
    /// Child fragments in order.
    pub children: Vec<RenderFragment>,
}

/// One node of rendered output.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderFragment {
    /// Plain text leaf.
    Text(String),
    /// Styled run.
    Styled(StyledRun),
    /// Unstyled grouping of children.
    Group {
        /// Child fragments in order.
        children: Vec<RenderFragment>,
    },
}

impl RenderFragment {
    /// Text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Unstyled group.
    pub fn group(children: Vec<RenderFragment>) -> Self {
        Self::Group { children }
    }

    /// Styled run without an activation handler.
    pub fn styled(style: StyleDict, children: Vec<RenderFragment>) -> Self {
        Self::Styled(StyledRun {
            style,
            activation: None,
            children,
        })
    }

    /// Child fragments (empty for text leaves).
    pub fn children(&self) -> &[RenderFragment] {
        match self {
            Self::Text(_) => &[],
            Self::Styled(run) => &run.children,
            Self::Group { children } => children,
        }
    }

    /// Text payload if this is a leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A flattened span: text plus the style and link inherited along its path.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatRun {
    /// Span text.
    pub text: String,
    /// Styles of all enclosing runs merged outer to inner.
    pub style: StyleDict,
    /// Innermost enclosing link handler.
    pub activation: Option<Activation>,
}

/// Concatenate all text leaves in order.
pub fn plain_text(fragments: &[RenderFragment]) -> String {
    let mut out = String::new();
    push_plain_text(fragments, &mut out);
    out
}

fn push_plain_text(fragments: &[RenderFragment], out: &mut String) {
    for fragment in fragments {
        match fragment {
            RenderFragment::Text(text) => out.push_str(text),
            other => push_plain_text(other.children(), out),
        }
    }
}

/// Flatten nested runs into contiguous spans with inherited styles.
///
/// Adjacent leaves with identical style and link are merged; empty leaves are
/// dropped.
pub fn flatten_runs(fragments: &[RenderFragment]) -> Vec<FlatRun> {
    let mut out = Vec::with_capacity(fragments.len());
    flatten_into(fragments, &StyleDict::new(), None, &mut out);
    out
}

fn flatten_into(
    fragments: &[RenderFragment],
    style: &StyleDict,
    activation: Option<&Activation>,
    out: &mut Vec<FlatRun>,
) {
    for fragment in fragments {
        match fragment {
            RenderFragment::Text(text) => {
                if text.is_empty() {
                    continue;
                }
                if let Some(last) = out.last_mut() {
                    if last.style == *style && last.activation.as_ref() == activation {
                        last.text.push_str(text);
                        continue;
                    }
                }
                out.push(FlatRun {
                    text: text.clone(),
                    style: style.clone(),
                    activation: activation.cloned(),
                });
            }
            RenderFragment::Styled(run) => {
                let mut inherited = style.clone();
                inherited.merge(&run.style);
                let activation = run.activation.as_ref().or(activation);
                flatten_into(&run.children, &inherited, activation, out);
            }
            RenderFragment::Group { children } => {
                flatten_into(children, style, activation, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleValue;

    fn bold() -> StyleDict {
        StyleDict::new().with("fontWeight", "bold")
    }

    #[test]
    fn plain_text_walks_all_leaves() {
        let fragments = vec![
            RenderFragment::styled(bold(), vec![RenderFragment::text("a")]),
            RenderFragment::group(vec![RenderFragment::text("b"), RenderFragment::text("c")]),
            RenderFragment::text("\n"),
        ];
        assert_eq!(plain_text(&fragments), "abc\n");
    }

    #[test]
    fn flatten_merges_inherited_styles() {
        let inner = StyleDict::new().with("fontSize", 20.0f32);
        let fragments = vec![RenderFragment::styled(
            bold(),
            vec![
                RenderFragment::text("x"),
                RenderFragment::styled(inner, vec![RenderFragment::text("y")]),
                RenderFragment::group(vec![RenderFragment::text("z")]),
            ],
        )];
        let runs = flatten_runs(&fragments);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].text, "x");
        assert_eq!(runs[1].text, "y");
        assert_eq!(runs[1].style.get("fontWeight"), Some(&StyleValue::from("bold")));
        assert_eq!(runs[1].style.get("fontSize"), Some(&StyleValue::Number(20.0)));
        assert_eq!(runs[2].text, "z");
        assert_eq!(runs[2].style, bold());
    }

    #[test]
    fn flatten_coalesces_adjacent_identical_spans() {
        let fragments = vec![
            RenderFragment::text("a"),
            RenderFragment::group(vec![RenderFragment::text("b"), RenderFragment::text("")]),
            RenderFragment::text("c"),
        ];
        let runs = flatten_runs(&fragments);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "abc");
    }

    #[test]
    fn serializes_to_compact_json() {
        let fragments = vec![
            RenderFragment::text("a"),
            RenderFragment::styled(bold(), vec![RenderFragment::text("b")]),
            RenderFragment::group(vec![RenderFragment::text("c")]),
        ];
        let json = serde_json::to_string(&fragments).expect("serialize");
        assert_eq!(
            json,
            r#"["a",{"style":{"fontWeight":"bold"},"children":["b"]},{"children":["c"]}]"#
        );
    }
}
