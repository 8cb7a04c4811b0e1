//! ANSI color codes for terminal output.
//!
//! Four semantic colors with orthogonal dim modifier:
//! - Blue: rule names
//! - Green: token names and literals
//! - Dim: structure, state ids, metadata
//! - Reset: return to default

/// ANSI color palette for trace and dump output.
///
/// Uses only standard 16-color ANSI codes (no RGB).
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    /// Colors enabled (ANSI escape codes).
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        green: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    /// Colors disabled (empty strings).
    pub const OFF: Self = Self {
        blue: "",
        green: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.blue.is_empty()
    }

    /// Wrap a rule name.
    pub fn rule(&self, name: &str) -> String {
        format!("{}{}{}", self.blue, name, self.reset)
    }

    /// Wrap a token name.
    pub fn token(&self, name: &str) -> String {
        format!("{}{}{}", self.green, name, self.reset)
    }

    /// Wrap structural text.
    pub fn dimmed(&self, text: &str) -> String {
        format!("{}{}{}", self.dim, text, self.reset)
    }
}
