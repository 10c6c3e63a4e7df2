use lit_core::WriteOpts;
use serde::{Deserialize, Serialize};

/// Configuration for the lit formatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingRules {
    /// String used for one level of indentation (usually 2 spaces)
    pub indent_string: String,

    /// Written at the start of every output line
    pub prefix: String,
}

impl Default for FormattingRules {
    fn default() -> Self {
        Self {
            indent_string: "  ".to_string(),
            prefix: String::new(),
        }
    }
}

impl FormattingRules {
    pub fn write_opts(&self) -> WriteOpts {
        WriteOpts {
            prefix: self.prefix.clone(),
            indent: self.indent_string.clone(),
            in_math: false,
        }
    }
}
