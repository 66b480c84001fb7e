//! Terminal colors shared by the CLI tables and the execution tracer.

/// Escape sequences for the few colors warpc prints with.
///
/// Blue marks dtypes and resolved symbols, dim marks structure such as
/// headers and offsets. Lanes are green when active and red when masked
/// off; red also marks illegal operand pairs. A disabled palette holds
/// empty strings, so callers interpolate fields unconditionally.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub red: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub const ON: Self = Self::palette(true);
    pub const OFF: Self = Self::palette(false);

    const fn palette(on: bool) -> Self {
        Self {
            blue: code(on, "\x1b[34m"),
            green: code(on, "\x1b[32m"),
            red: code(on, "\x1b[31m"),
            dim: code(on, "\x1b[2m"),
            reset: code(on, "\x1b[0m"),
        }
    }

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }

    /// Color for a lane, by whether its mask bit is set.
    pub fn lane(&self, active: bool) -> &'static str {
        if active { self.green } else { self.red }
    }
}

const fn code(on: bool, seq: &'static str) -> &'static str {
    if on { seq } else { "" }
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}
