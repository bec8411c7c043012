//! Argument model: one parameter (or the keyword-only separator) of a signature

use crate::StubError;
use serde::Serialize;
use std::cmp::Ordering;

/// Parameter category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    Positional,
    VarPositional,
    KeywordOnly,
    VarKeyword,
    /// The bare `*` between positional and keyword-only arguments
    Separator,
    /// `cls` synthesized for classmethods
    Cls,
}

impl ArgKind {
    pub fn is_variadic(self) -> bool {
        matches!(self, Self::VarPositional | Self::VarKeyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positional => "positional",
            Self::VarPositional => "var_positional",
            Self::KeywordOnly => "keyword_only",
            Self::VarKeyword => "var_keyword",
            Self::Separator => "separator",
            Self::Cls => "cls",
        }
    }
}

/// Default value of a parameter. `Missing` is distinct from `Value("None")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    #[default]
    Missing,
    Value(String),
}

impl DefaultValue {
    pub fn value(text: impl Into<String>) -> Self {
        Self::Value(text.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Missing => None,
            Self::Value(v) => Some(v),
        }
    }
}

/// One parameter of a canonical signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    pub kind: ArgKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    pub default_value: DefaultValue,
    pub is_required: bool,
}

impl Argument {
    /// Build an argument as reported by signature introspection.
    ///
    /// Variadic names receive their `*` / `**` marker here.
    pub fn new(
        name: &str,
        kind: ArgKind,
        declared_type: Option<String>,
        default_value: DefaultValue,
    ) -> crate::Result<Self> {
        if kind.is_variadic() && !default_value.is_missing() {
            return Err(StubError::InvalidArgument {
                name: name.to_string(),
                message: "variadic parameters cannot have a default value".to_string(),
            });
        }
        if matches!(kind, ArgKind::Separator | ArgKind::Cls) {
            return Err(StubError::InvalidArgument {
                name: name.to_string(),
                message: format!("{} entries are synthesized, not introspected", kind.as_str()),
            });
        }

        let name = match kind {
            ArgKind::VarPositional => format!("*{}", name.trim_start_matches('*')),
            ArgKind::VarKeyword => format!("**{}", name.trim_start_matches('*')),
            _ => name.to_string(),
        };
        let is_required = default_value.is_missing() && !kind.is_variadic();

        Ok(Self {
            name,
            kind,
            declared_type,
            default_value,
            is_required,
        })
    }

    /// The bare `*` separating positional and keyword-only arguments
    pub fn separator() -> Self {
        Self {
            name: "*".to_string(),
            kind: ArgKind::Separator,
            declared_type: None,
            default_value: DefaultValue::Missing,
            is_required: false,
        }
    }

    /// Synthetic leading `cls` of a classmethod
    pub fn cls() -> Self {
        Self {
            name: "cls".to_string(),
            kind: ArgKind::Cls,
            declared_type: None,
            default_value: DefaultValue::Missing,
            is_required: false,
        }
    }

    /// Keyword-only argument known only from documentation
    pub fn from_docstring(
        name: &str,
        declared_type: Option<String>,
        default_value: DefaultValue,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind: ArgKind::KeywordOnly,
            declared_type,
            default_value,
            is_required: false,
        }
    }

    /// Name used to match documentation entries.
    ///
    /// Variadic positional arguments match on their bare name; the variadic
    /// keyword argument keeps its `**` marker.
    pub fn lookup_key(&self) -> &str {
        match self.kind {
            ArgKind::VarPositional => self.name.trim_start_matches('*'),
            _ => &self.name,
        }
    }
}

impl PartialOrd for Argument {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Argument {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.kind.as_str().cmp(other.kind.as_str()))
    }
}
