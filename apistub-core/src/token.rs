//! Render token stream consumed by the review viewer

use crate::diagnostics::{Diagnostic, DiagnosticLevel};
use serde::Serialize;

/// One atomic unit of the output stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderToken {
    Keyword {
        value: String,
    },
    Punctuation {
        value: String,
    },
    Whitespace,
    Newline,
    TypeReference {
        value: String,
    },
    Text {
        value: String,
        /// Set when this text defines the symbol with this id
        #[serde(skip_serializing_if = "Option::is_none")]
        definition_id: Option<String>,
    },
    /// Stable id other tools use to attach comments to this line
    LineAnchor {
        id: String,
    },
    GroupBegin,
    GroupEnd,
    Diagnostic {
        target_id: String,
        level: DiagnosticLevel,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        help_link: Option<String>,
    },
}

impl RenderToken {
    pub fn diagnostic(target_id: &str, diagnostic: &Diagnostic) -> Self {
        Self::Diagnostic {
            target_id: target_id.to_string(),
            level: diagnostic.level,
            message: diagnostic.message.clone(),
            help_link: diagnostic.help_link.clone(),
        }
    }

    /// Text this token contributes to a plain rendering
    pub fn display_text(&self) -> &str {
        match self {
            Self::Keyword { value }
            | Self::Punctuation { value }
            | Self::TypeReference { value }
            | Self::Text { value, .. } => value,
            Self::Whitespace => " ",
            Self::Newline => "\n",
            Self::LineAnchor { .. } | Self::GroupBegin | Self::GroupEnd | Self::Diagnostic { .. } => "",
        }
    }
}

/// Render tokens as plain text.
///
/// Each group nesting level indents a line by four spaces; leading whitespace
/// tokens are absorbed by that indentation. Diagnostics are
/// appended as `# <level>: <message>` comment lines.
pub fn render_plain(tokens: &[RenderToken]) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    let mut line_start = true;

    for token in tokens {
        match token {
            RenderToken::GroupBegin => depth += 1,
            RenderToken::GroupEnd => depth = depth.saturating_sub(1),
            RenderToken::Newline => {
                out.push('\n');
                line_start = true;
            }
            // Indentation comes from group depth
            RenderToken::Whitespace if line_start => continue,
            RenderToken::Diagnostic { level, message, .. } => {
                if !line_start {
                    out.push('\n');
                }
                out.push_str(&format!("# {}: {}\n", level.as_str(), message));
                line_start = true;
            }
            other => {
                let text = other.display_text();
                if text.is_empty() {
                    continue;
                }
                if line_start {
                    out.push_str(&"    ".repeat(depth));
                    line_start = false;
                }
                out.push_str(text);
            }
        }
    }

    out
}
