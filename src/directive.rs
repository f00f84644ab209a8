//! Per-tag formatting directives.
//!
//! Only tags that change the emitted text are listed; every other tag renders
//! its children inline with no injected whitespace.

/// Tags with a formatting directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `<a>`
    Anchor,
    /// `<address>`
    Address,
    /// `<article>`
    Article,
    /// `<aside>`
    Aside,
    /// `<blockquote>`
    Blockquote,
    /// `<body>`
    Body,
    /// `<br>`
    LineBreak,
    /// `<dd>`
    DescriptionDetails,
    /// `<div>`
    Div,
    /// `<dl>`
    DescriptionList,
    /// `<dt>`
    DescriptionTerm,
    /// `<fieldset>`
    Fieldset,
    /// `<figcaption>`
    FigureCaption,
    /// `<figure>`
    Figure,
    /// `<footer>`
    Footer,
    /// `<form>`
    Form,
    /// `<h1>` through `<h6>`.
    Heading(u8),
    /// `<head>`
    Head,
    /// `<header>`
    Header,
    /// `<hr>`
    HorizontalRule,
    /// `<img>`
    Image,
    /// `<li>`
    ListItem,
    /// `<main>`
    Main,
    /// `<nav>`
    Nav,
    /// `<noscript>`
    NoScript,
    /// `<ol>`
    OrderedList,
    /// `<p>`
    Paragraph,
    /// `<pre>`
    Preformatted,
    /// `<script>`
    Script,
    /// `<section>`
    Section,
    /// `<style>`
    Style,
    /// `<table>`
    Table,
    /// `<template>`
    Template,
    /// `<tr>`
    TableRow,
    /// `<ul>`
    UnorderedList,
}

/// Tag names paired with their variant, all lowercase.
const TAG_NAMES: &[(&str, Tag)] = &[
    ("a", Tag::Anchor),
    ("address", Tag::Address),
    ("article", Tag::Article),
    ("aside", Tag::Aside),
    ("blockquote", Tag::Blockquote),
    ("body", Tag::Body),
    ("br", Tag::LineBreak),
    ("dd", Tag::DescriptionDetails),
    ("div", Tag::Div),
    ("dl", Tag::DescriptionList),
    ("dt", Tag::DescriptionTerm),
    ("fieldset", Tag::Fieldset),
    ("figcaption", Tag::FigureCaption),
    ("figure", Tag::Figure),
    ("footer", Tag::Footer),
    ("form", Tag::Form),
    ("h1", Tag::Heading(1)),
    ("h2", Tag::Heading(2)),
    ("h3", Tag::Heading(3)),
    ("h4", Tag::Heading(4)),
    ("h5", Tag::Heading(5)),
    ("h6", Tag::Heading(6)),
    ("head", Tag::Head),
    ("header", Tag::Header),
    ("hr", Tag::HorizontalRule),
    ("img", Tag::Image),
    ("li", Tag::ListItem),
    ("main", Tag::Main),
    ("nav", Tag::Nav),
    ("noscript", Tag::NoScript),
    ("ol", Tag::OrderedList),
    ("p", Tag::Paragraph),
    ("pre", Tag::Preformatted),
    ("script", Tag::Script),
    ("section", Tag::Section),
    ("style", Tag::Style),
    ("table", Tag::Table),
    ("template", Tag::Template),
    ("tr", Tag::TableRow),
    ("ul", Tag::UnorderedList),
];

impl Tag {
    /// Resolve a tag name (case-insensitive, without allocating).
    pub fn from_name(name: &str) -> Option<Self> {
        TAG_NAMES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|&(_, tag)| tag)
    }

    /// The directive for this tag.
    pub fn directive(self) -> Directive {
        match self {
            Self::LineBreak => Directive::Replace("\n"),
            Self::HorizontalRule => Directive::Replace("\n\n"),
            Self::Head | Self::NoScript | Self::Script | Self::Style | Self::Template => {
                Directive::Replace("")
            }
            Self::Image | Self::Table => Directive::Surround {
                before: Some("\n"),
                after: Some("\n"),
            },
            Self::Anchor => Directive::Activate,
            Self::Address
            | Self::Article
            | Self::Aside
            | Self::Blockquote
            | Self::Body
            | Self::DescriptionDetails
            | Self::Div
            | Self::DescriptionList
            | Self::DescriptionTerm
            | Self::Fieldset
            | Self::FigureCaption
            | Self::Figure
            | Self::Footer
            | Self::Form
            | Self::Heading(_)
            | Self::Header
            | Self::ListItem
            | Self::Main
            | Self::Nav
            | Self::OrderedList
            | Self::Paragraph
            | Self::Preformatted
            | Self::Section
            | Self::TableRow
            | Self::UnorderedList => Directive::Surround {
                before: None,
                after: Some("\n"),
            },
        }
    }
}

/// Formatting directive for a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    /// Replace the element and its children with a literal string.
    Replace(&'static str),
    /// Emit literals around the element's rendered content.
    Surround {
        /// Emitted before the content.
        before: Option<&'static str>,
        /// Emitted after the content.
        after: Option<&'static str>,
    },
    /// The element may carry a link activation handler.
    Activate,
}

impl Directive {
    /// Directive for a tag name, if it has one.
    pub fn lookup(tag_name: &str) -> Option<Self> {
        Tag::from_name(tag_name).map(Tag::directive)
    }

    /// Literal replacement content.
    pub fn literal_content(&self) -> Option<&'static str> {
        match self {
            Self::Replace(literal) => Some(literal),
            _ => None,
        }
    }

    /// Literal emitted before the content.
    pub fn before_content(&self) -> Option<&'static str> {
        match self {
            Self::Surround { before, .. } => *before,
            _ => None,
        }
    }

    /// Literal emitted after the content.
    pub fn after_content(&self) -> Option<&'static str> {
        match self {
            Self::Surround { after, .. } => *after,
            _ => None,
        }
    }

    /// Whether an activation handler may be attached.
    pub fn can_activate(&self) -> bool {
        matches!(self, Self::Activate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_tags_append_newline() {
        for tag in [
            "p", "h1", "h6", "ul", "ol", "li", "tr", "div", "section", "article", "body",
        ] {
            let directive = Directive::lookup(tag).expect("block tag has a directive");
            assert_eq!(directive.after_content(), Some("\n"), "tag {}", tag);
            assert_eq!(directive.before_content(), None, "tag {}", tag);
            assert_eq!(directive.literal_content(), None, "tag {}", tag);
        }
    }

    #[test]
    fn replaced_tags() {
        assert_eq!(Directive::lookup("br"), Some(Directive::Replace("\n")));
        assert_eq!(Directive::lookup("HR"), Some(Directive::Replace("\n\n")));
        assert_eq!(
            Directive::lookup("script").and_then(|d| d.literal_content()),
            Some("")
        );
    }

    #[test]
    fn image_and_table_surround_with_newlines() {
        for tag in ["img", "table"] {
            let directive = Directive::lookup(tag).expect("directive");
            assert_eq!(directive.before_content(), Some("\n"));
            assert_eq!(directive.after_content(), Some("\n"));
        }
    }

    #[test]
    fn anchor_activates_without_whitespace() {
        let directive = Directive::lookup("a").expect("anchor directive");
        assert!(directive.can_activate());
        assert_eq!(directive.before_content(), None);
        assert_eq!(directive.after_content(), None);
    }

    #[test]
    fn unknown_tags_have_no_directive() {
        assert_eq!(Directive::lookup("span"), None);
        assert_eq!(Directive::lookup("b"), None);
        assert_eq!(Directive::lookup("h7"), None);
        assert_eq!(Directive::lookup(""), None);
    }

    #[test]
    fn lookup_ignores_ascii_case() {
        assert_eq!(Tag::from_name("BlockQuote"), Some(Tag::Blockquote));
        assert_eq!(Tag::from_name("H3"), Some(Tag::Heading(3)));
        assert_eq!(Tag::from_name("FIGCAPTION"), Some(Tag::FigureCaption));
        assert_eq!(Tag::from_name("\u{130}mg"), None);
    }

    #[test]
    fn every_tag_name_is_lowercase_and_unique() {
        for (idx, (name, tag)) in TAG_NAMES.iter().enumerate() {
            assert_eq!(name.to_ascii_lowercase(), *name);
            assert_eq!(Tag::from_name(name), Some(*tag), "tag {}", name);
            assert!(TAG_NAMES[idx + 1..].iter().all(|(other, _)| other != name));
        }
    }
}
