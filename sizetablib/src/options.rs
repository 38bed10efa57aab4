//! Rendering options for table output.

use crate::charset::Charset;

/// Options controlling table layout and glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Cap on a name column's intrinsic width before wrapping kicks in
    pub col_max_width: usize,
    /// Border glyph set
    pub charset: Charset,
    /// Emit reStructuredText-compatible output: cell text is wrapped in
    /// inline literals, every row is followed by a plain divider, and the
    /// table ends with a trailing newline
    pub rst_output: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            col_max_width: 80,
            charset: Charset::ASCII,
            rst_output: false,
        }
    }
}

impl RenderOptions {
    /// ASCII output with an 80-column name cap (default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the name column width cap
    pub fn with_col_max_width(mut self, width: usize) -> Self {
        self.col_max_width = width;
        self
    }

    /// Builder: set the border glyph set
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Builder: toggle reStructuredText-compatible output
    pub fn with_rst_output(mut self, rst: bool) -> Self {
        self.rst_output = rst;
        self
    }
}
