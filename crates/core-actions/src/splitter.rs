//! Formatting a matched line into its multi-line replacement.

use crate::policy::{LineMatch, PolicyError, ScanScope, SplitPolicy};
use crate::scan;
use core_config::{ArgumentStyle, SplitConfig};

/// A matching policy plus the layout used for its replacement lines.
#[derive(Debug, Clone)]
pub struct Splitter {
    policy: SplitPolicy,
    indent_unit: String,
    style: ArgumentStyle,
}

impl Splitter {
    pub fn new(policy: SplitPolicy, indent_unit: impl Into<String>, style: ArgumentStyle) -> Self {
        Self {
            policy,
            indent_unit: indent_unit.into(),
            style,
        }
    }

    /// General call-site splitter configured from `[split]`.
    pub fn call(config: &SplitConfig) -> Result<Self, PolicyError> {
        Ok(Self::new(
            SplitPolicy::call()?,
            config.indent_unit.clone(),
            config.arguments,
        ))
    }

    /// Declaration splitter configured from `[split]`.
    pub fn declaration(config: &SplitConfig) -> Result<Self, PolicyError> {
        Ok(Self::new(
            SplitPolicy::declaration(&config.declaration_keywords)?,
            config.indent_unit.clone(),
            config.arguments,
        ))
    }

    pub fn policy(&self) -> &SplitPolicy {
        &self.policy
    }

    pub fn scope(&self) -> ScanScope {
        self.policy.scope()
    }

    /// Replacement lines for `line`, or `None` when it is not splittable.
    pub fn split_line(&self, line: &str) -> Option<Vec<String>> {
        let m = self.policy.match_line(line)?;
        Some(self.format(&m))
    }

    /// Head line, one line per argument, then the tail line. Every line starts
    /// with the original indentation; argument lines add one indent unit.
    pub fn format(&self, m: &LineMatch<'_>) -> Vec<String> {
        let args = match self.style {
            ArgumentStyle::Balanced => scan::split_top_level(m.args),
            ArgumentStyle::Sentinel => split_sentinel(m.args),
        };
        let mut lines = Vec::with_capacity(args.len() + 2);
        lines.push(format!("{}{}", m.indent, m.head));
        lines.extend(
            args.iter()
                .map(|arg| format!("{}{}{}", m.indent, self.indent_unit, arg)),
        );
        lines.push(format!("{}{}", m.indent, m.tail));
        lines
    }
}

/// Legacy argument splitting: every `", "` becomes `",  "`, then the text is
/// cut at each double space and empty pieces are dropped. Arguments holding
/// their own `", "` or runs of spaces are cut apart too.
pub fn split_sentinel(args: &str) -> Vec<String> {
    args.replace(", ", ",  ")
        .split("  ")
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
