//! Structured errors for the parse stage.
//!
//! Rendering itself never fails; everything here is raised while turning the
//! input string into a [`Document`](crate::dom::Document).

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

/// Processing phase an error originated in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorPhase {
    /// Input size checks before tokenizing.
    Input,
    /// Markup tokenizing and tree building.
    Parse,
}

impl fmt::Display for ErrorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Parse => f.write_str("parse"),
        }
    }
}

/// Typed actual-vs-limit context for limit violations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorLimitContext {
    /// Name of the violated limit.
    pub kind: &'static str,
    /// Observed value.
    pub actual: usize,
    /// Configured limit.
    pub limit: usize,
}

impl ErrorLimitContext {
    /// Build a limit context.
    pub fn new(kind: &'static str, actual: usize, limit: usize) -> Self {
        Self {
            kind,
            actual,
            limit,
        }
    }
}

/// Structured error for markup parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupError {
    /// Processing phase where this error originated.
    pub phase: ErrorPhase,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: Box<str>,
    /// Optional byte offset into the input.
    pub token_offset: Option<usize>,
    /// Optional source context (tag name, tokenizer step).
    pub source: Option<Box<str>>,
    /// Optional typed actual-vs-limit context.
    pub limit: Option<Box<ErrorLimitContext>>,
}

impl MarkupError {
    pub(crate) fn new(phase: ErrorPhase, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            phase,
            code,
            message: message.into().into_boxed_str(),
            token_offset: None,
            source: None,
            limit: None,
        }
    }

    pub(crate) fn with_token_offset(mut self, token_offset: usize) -> Self {
        self.token_offset = Some(token_offset);
        self
    }

    pub(crate) fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into().into_boxed_str());
        self
    }

    pub(crate) fn with_limit(mut self, kind: &'static str, actual: usize, limit: usize) -> Self {
        self.limit = Some(Box::new(ErrorLimitContext::new(kind, actual, limit)));
        self
    }
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.phase, self.code, self.message)?;
        if let Some(source) = self.source.as_deref() {
            write!(f, " [source={}]", source)?;
        }
        if let Some(token_offset) = self.token_offset {
            write!(f, " [token_offset={}]", token_offset)?;
        }
        if let Some(limit) = self.limit.as_deref() {
            write!(
                f,
                " [limit_kind={} actual={} limit={}]",
                limit.kind, limit.actual, limit.limit
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for MarkupError {}

/// Failure reported by a [`LinkNavigator`](crate::activation::LinkNavigator)
/// while validating a link target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationError {
    /// Human-readable message.
    pub message: Box<str>,
}

impl NavigationError {
    /// Build a navigation error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into().into_boxed_str(),
        }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "navigation: {}", self.message)
    }
}

impl std::error::Error for NavigationError {}
