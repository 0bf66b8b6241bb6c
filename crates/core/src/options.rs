//! Compiler configuration.

use serde::Deserialize;

/// Knobs for the compile pipeline. All fields default to the strict
/// behavior; hosts may load this from JSON or TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Accept a string literal with no closing quote, extending it to the
    /// end of the input instead of failing.
    pub allow_unterminated_strings: bool,
    /// Accept `goto` targets that no label form ever declares. Such targets
    /// remain in the graph as dead-end named states.
    pub allow_unresolved_labels: bool,
}
