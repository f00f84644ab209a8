//! List bullet and number prefixes.

use std::borrow::Cow;

use crate::dom::{Document, NodeId};

/// Prefix for children of `<ul>`.
pub const BULLET_PREFIX: &str = "\u{2022} ";
/// Prefix for `<ol>` children that are not list items.
pub const FALLBACK_PREFIX: &str = "- ";

/// Prefix for `node` based on its parent list, or `""` outside lists.
///
/// Children of `<ol>` are numbered by their position among the list's `<li>`
/// children, starting at the list's `start` attribute (default 1). An `<ol>`
/// child that is not an `<li>`, or whose number would overflow, gets
/// [`FALLBACK_PREFIX`].
pub fn list_prefix(doc: &Document, node: NodeId) -> Cow<'static, str> {
    let Some(parent) = doc.parent(node) else {
        return Cow::Borrowed("");
    };
    match doc.tag_name(parent) {
        Some("ul") => Cow::Borrowed(BULLET_PREFIX),
        Some("ol") => {
            let position = doc
                .children(parent)
                .iter()
                .filter(|&&child| doc.tag_name(child) == Some("li"))
                .position(|&child| child == node);
            let number = position.and_then(|position| {
                let position = i64::try_from(position).ok()?;
                ordered_list_start(doc, parent).checked_add(position)
            });
            match number {
                Some(number) => Cow::Owned(format!("{}. ", number)),
                None => Cow::Borrowed(FALLBACK_PREFIX),
            }
        }
        _ => Cow::Borrowed(""),
    }
}

fn ordered_list_start(doc: &Document, list: NodeId) -> i64 {
    doc.element(list)
        .and_then(|element| element.attribute("start"))
        .and_then(|start| start.trim().parse::<i64>().ok())
        .unwrap_or(1)
}
