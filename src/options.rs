//! Render options and parse limits.

/// Hard limits applied while parsing markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkupLimits {
    /// Maximum input size in bytes.
    pub max_input_bytes: usize,
    /// Maximum element nesting depth.
    pub max_depth: usize,
    /// Inline `style` attributes longer than this are ignored at render time.
    pub max_inline_style_bytes: usize,
}

impl Default for MarkupLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: 4 * 1024 * 1024,
            max_depth: 256,
            max_inline_style_bytes: 16 * 1024,
        }
    }
}

impl MarkupLimits {
    /// Tighter preset for untrusted, chat-sized snippets.
    pub fn compact() -> Self {
        Self {
            max_input_bytes: 64 * 1024,
            max_depth: 48,
            max_inline_style_bytes: 1024,
        }
    }
}

/// Render configuration bundle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Ambient font size for the document root.
    pub base_font_size: f32,
    /// Whether anchors get activation handlers.
    pub allow_link_activation: bool,
    /// Parse limits.
    pub limits: MarkupLimits,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base_font_size: 16.0,
            allow_link_activation: false,
            limits: MarkupLimits::default(),
        }
    }
}
