//! Printer configuration.

/// Configuration options for the declaration printer.
#[derive(Debug, Clone)]
pub struct PrintConfig {
    /// Number of spaces per indentation level.
    pub indent_size: usize,
    /// Use tabs instead of spaces for indentation.
    pub use_tabs: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            indent_size: 4,
            use_tabs: false,
        }
    }
}

impl PrintConfig {
    /// Create a new config with custom indent size.
    pub fn with_indent_size(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }

    /// Create a new config using tabs for indentation.
    pub fn with_tabs(mut self) -> Self {
        self.use_tabs = true;
        self
    }

    /// Get the indentation string for one level.
    pub fn indent_str(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_size)
        }
    }
}
