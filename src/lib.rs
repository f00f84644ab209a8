//! Markup to styled text runs.
//!
//! `markup-runs` turns a fragment of HTML-like markup into an ordered tree of
//! plain and styled text fragments for hosts that can only draw one
//! inline-flowed text primitive. Block elements become line breaks, list items
//! get bullet or number prefixes, `em`/`pt` sizes are resolved to absolute
//! values, and links carry press handlers that go live once their target has
//! been validated in the background.
//!
//! ```rust
//! use markup_runs::{MarkupRenderer, RenderOptions};
//!
//! # fn main() -> Result<(), markup_runs::MarkupError> {
//! let renderer = MarkupRenderer::new(RenderOptions::default());
//! let rendered = renderer.render("<p>Hello <b>world</b></p><ul><li>one</li></ul>")?;
//! assert_eq!(rendered.plain_text(), "Hello world\n\u{2022} one\n\n");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod activation;
pub mod directive;
pub mod dom;
pub mod entities;
pub mod error;
pub mod fragment;
pub mod inline_style;
pub mod list;
pub mod options;
pub mod render;
pub mod style;

pub use activation::{Activation, ActivationState, LinkNavigator, NavFuture};
pub use directive::{Directive, Tag};
pub use dom::{parse_markup, Document, Element, NodeId, NodeKind};
pub use error::{ErrorLimitContext, ErrorPhase, MarkupError, NavigationError};
pub use fragment::{flatten_runs, plain_text, FlatRun, RenderFragment, StyledRun};
pub use list::list_prefix;
pub use options::{MarkupLimits, RenderOptions};
pub use render::{render, render_markup, MarkupRenderer, RenderContext, RenderedMarkup};
pub use style::{normalize_styles, NormalizedStyle, StyleDict, StyleValue, TagStyleTable};
