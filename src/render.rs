//! Tree-to-fragment rendering.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use std::sync::Arc;

use crate::activation::{Activation, LinkNavigator};
use crate::directive::Directive;
use crate::dom::{parse_markup, Document, Element, NodeId, NodeKind};
use crate::entities::decode_entities;
use crate::error::MarkupError;
use crate::fragment::{flatten_runs, plain_text, FlatRun, RenderFragment, StyledRun};
use crate::inline_style::parse_inline_style;
use crate::list::list_prefix;
use crate::options::{MarkupLimits, RenderOptions};
use crate::style::{normalize_styles, StyleDict, TagStyleTable};

/// Read-only state shared by every step of a render walk.
#[derive(Clone)]
pub struct RenderContext {
    /// Ambient font size for the document root.
    pub base_font_size: f32,
    /// Default style per tag, merged under inline styles.
    pub tag_styles: TagStyleTable,
    /// Whether anchors get activation handlers.
    pub allow_link_activation: bool,
    /// Facility that validates and opens link targets.
    pub navigator: Option<Arc<dyn LinkNavigator>>,
    /// Parse limits, also bounding inline style size.
    pub limits: MarkupLimits,
}

impl RenderContext {
    /// Context from options with an empty tag style table and no navigator.
    pub fn from_options(options: &RenderOptions) -> Self {
        Self {
            base_font_size: options.base_font_size,
            tag_styles: TagStyleTable::new(),
            allow_link_activation: options.allow_link_activation,
            navigator: None,
            limits: options.limits,
        }
    }

    /// Replace the tag style table.
    pub fn with_tag_styles(mut self, tag_styles: TagStyleTable) -> Self {
        self.tag_styles = tag_styles;
        self
    }

    /// Set the link navigator.
    pub fn with_navigator(mut self, navigator: Arc<dyn LinkNavigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::from_options(&RenderOptions::default())
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("base_font_size", &self.base_font_size)
            .field("tag_styles", &self.tag_styles)
            .field("allow_link_activation", &self.allow_link_activation)
            .field("navigator", &self.navigator.as_ref().map(|_| "<navigator>"))
            .field("limits", &self.limits)
            .finish()
    }
}

/// Parse `markup` and render the whole document at the context's base size.
pub fn render_markup(
    markup: &str,
    ctx: &RenderContext,
) -> Result<Vec<RenderFragment>, MarkupError> {
    let doc = parse_markup(markup, &ctx.limits)?;
    Ok(render(&doc, doc.root(), ctx, ctx.base_font_size))
}

/// Render the children of `node`.
///
/// `ambient_font_size` is the font size relative units resolve against; each
/// element passes its effective size down to its own children.
pub fn render(
    doc: &Document,
    node: NodeId,
    ctx: &RenderContext,
    ambient_font_size: f32,
) -> Vec<RenderFragment> {
    let children = doc.children(node);
    let mut out = Vec::with_capacity(children.len());
    for &child in children {
        match doc.kind(child) {
            NodeKind::Text(raw) => {
                out.push(RenderFragment::Text(decode_entities(raw).into_owned()));
            }
            NodeKind::Element(element) => {
                render_element(doc, child, element, ctx, ambient_font_size, &mut out);
            }
            NodeKind::Document | NodeKind::Comment(_) => {}
        }
    }
    out
}

fn render_element(
    doc: &Document,
    node: NodeId,
    element: &Element,
    ctx: &RenderContext,
    ambient_font_size: f32,
    out: &mut Vec<RenderFragment>,
) {
    let directive = Directive::lookup(element.tag());
    if let Some(literal) = directive.and_then(|d| d.literal_content()) {
        if !literal.is_empty() {
            out.push(RenderFragment::text(literal));
        }
        return;
    }

    let inline = inline_style(element, ctx);
    let normalized = normalize_styles(
        ambient_font_size,
        &[ctx.tag_styles.get(element.tag()), inline.as_ref()],
    );
    let children = render(doc, node, ctx, normalized.effective_font_size);
    let prefix = list_prefix(doc, node);
    let activation = directive
        .filter(Directive::can_activate)
        .and_then(|_| link_activation(element, ctx));

    let mut content = Vec::with_capacity(children.len() + 1);
    if !prefix.is_empty() {
        content.push(RenderFragment::Text(prefix.into_owned()));
    }
    content.extend(children);

    let wrapped = if normalized.style.is_empty() && activation.is_none() {
        RenderFragment::group(content)
    } else {
        RenderFragment::Styled(StyledRun {
            style: normalized.style,
            activation,
            children: content,
        })
    };

    if let Some(before) = directive.and_then(|d| d.before_content()) {
        out.push(RenderFragment::text(before));
    }
    out.push(wrapped);
    if let Some(after) = directive.and_then(|d| d.after_content()) {
        out.push(RenderFragment::text(after));
    }
}

fn inline_style(element: &Element, ctx: &RenderContext) -> Option<StyleDict> {
    let attr = element.attribute("style")?;
    if attr.len() > ctx.limits.max_inline_style_bytes {
        log::warn!(
            "Inline style on <{}> exceeds max_inline_style_bytes ({} > {}); ignoring it",
            element.tag(),
            attr.len(),
            ctx.limits.max_inline_style_bytes
        );
        return None;
    }
    let style = parse_inline_style(attr);
    (!style.is_empty()).then_some(style)
}

fn link_activation(element: &Element, ctx: &RenderContext) -> Option<Activation> {
    if !ctx.allow_link_activation {
        return None;
    }
    let target = element
        .attribute("href")
        .or_else(|| element.attribute("xlink:href"))
        .map(str::trim)
        .filter(|target| !target.is_empty())?;
    let Some(navigator) = ctx.navigator.as_ref() else {
        log::debug!("No link navigator configured; {} stays inert", target);
        return None;
    };
    Some(Activation::spawn(target, Arc::clone(navigator)))
}

/// Output of one render pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedMarkup {
    fragments: Vec<RenderFragment>,
}

impl RenderedMarkup {
    /// Top-level fragments in order.
    pub fn fragments(&self) -> &[RenderFragment] {
        &self.fragments
    }

    /// Take ownership of the fragments.
    pub fn into_fragments(self) -> Vec<RenderFragment> {
        self.fragments
    }

    /// All text concatenated.
    pub fn plain_text(&self) -> String {
        plain_text(&self.fragments)
    }

    /// Flattened spans with inherited styles.
    pub fn runs(&self) -> Vec<FlatRun> {
        flatten_runs(&self.fragments)
    }

    /// Every activation handler in document order.
    pub fn activations(&self) -> Vec<&Activation> {
        let mut out = Vec::new();
        collect_activations(&self.fragments, &mut out);
        out
    }
}

fn collect_activations<'a>(fragments: &'a [RenderFragment], out: &mut Vec<&'a Activation>) {
    for fragment in fragments {
        if let RenderFragment::Styled(run) = fragment {
            if let Some(activation) = &run.activation {
                out.push(activation);
            }
        }
        collect_activations(fragment.children(), out);
    }
}

/// Render orchestrator owning the context for repeated renders.
#[derive(Clone, Debug)]
pub struct MarkupRenderer {
    ctx: RenderContext,
}

impl MarkupRenderer {
    /// Renderer with [`TagStyleTable::html_defaults`] and no navigator.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            ctx: RenderContext::from_options(&options)
                .with_tag_styles(TagStyleTable::html_defaults()),
        }
    }

    /// Renderer over an explicit context.
    pub fn from_context(ctx: RenderContext) -> Self {
        Self { ctx }
    }

    /// Replace the tag style table.
    pub fn with_tag_styles(mut self, tag_styles: TagStyleTable) -> Self {
        self.ctx.tag_styles = tag_styles;
        self
    }

    /// Set the link navigator.
    pub fn with_navigator(mut self, navigator: Arc<dyn LinkNavigator>) -> Self {
        self.ctx.navigator = Some(navigator);
        self
    }

    /// The render context.
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Parse and render a markup string.
    pub fn render(&self, markup: &str) -> Result<RenderedMarkup, MarkupError> {
        let doc = parse_markup(markup, &self.ctx.limits)?;
        log::trace!("Parsed {} bytes into {} nodes", markup.len(), doc.len());
        Ok(self.render_document(&doc))
    }

    /// Render an already parsed document.
    pub fn render_document(&self, doc: &Document) -> RenderedMarkup {
        RenderedMarkup {
            fragments: render(doc, doc.root(), &self.ctx, self.ctx.base_font_size),
        }
    }
}
