//! Canonical descriptions of callables and variables

use crate::argument::{ArgKind, Argument};
use crate::source::ElementLocation;
use crate::StubError;
use serde::Serialize;

/// Canonical, merged description of one callable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    /// Unique within the namespace; async callables carry a `:async` suffix
    pub identity: String,
    pub is_async: bool,
    pub is_classmethod: bool,
    pub is_module_level: bool,
    /// Decorators as `@name`, in source order
    pub annotations: Vec<String>,
    pub arguments: Vec<Argument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(skip)]
    pub location: Option<ElementLocation>,
}

impl FunctionSignature {
    /// Name shown in the rendered signature
    pub fn display_name(&self) -> &str {
        if self.is_module_level {
            self.identity.trim_end_matches(":async")
        } else {
            &self.name
        }
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Required parameters that no source supplied a type for
    pub fn type_gaps(&self) -> Vec<StubError> {
        self.arguments
            .iter()
            .filter(|a| matches!(a.kind, ArgKind::Positional | ArgKind::KeywordOnly))
            .filter(|a| a.is_required && a.declared_type.is_none())
            .filter(|a| a.name != "self")
            .map(|a| StubError::UnresolvedType {
                identity: self.identity.clone(),
                parameter: a.name.clone(),
            })
            .collect()
    }
}

/// Class or instance variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSignature {
    pub name: String,
    /// `<parent identity>.<name>(<type>)`
    pub identity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub is_ivar: bool,
    #[serde(skip)]
    pub location: Option<ElementLocation>,
}

impl VariableSignature {
    pub fn new(
        parent_identity: &str,
        name: impl Into<String>,
        type_name: Option<String>,
        value: Option<String>,
        is_ivar: bool,
    ) -> Self {
        let name = name.into();
        let identity = format!(
            "{}.{}({})",
            parent_identity,
            name,
            type_name.as_deref().unwrap_or("None")
        );
        Self {
            name,
            identity,
            type_name,
            value,
            is_ivar,
            location: None,
        }
    }
}

/// Header of a class: name and base classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSignature {
    pub name: String,
    pub identity: String,
    pub bases: Vec<String>,
    #[serde(skip)]
    pub location: Option<ElementLocation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::DefaultValue;

    #[test]
    fn test_variable_identity() {
        let var = VariableSignature::new("pkg.Client", "endpoint", Some("str".into()), None, true);
        assert_eq!(var.identity, "pkg.Client.endpoint(str)");
        let untyped = VariableSignature::new("pkg.Client", "MAX", None, Some("5".into()), false);
        assert_eq!(untyped.identity, "pkg.Client.MAX(None)");
    }

    #[test]
    fn test_type_gaps_skip_self_and_defaults() {
        let sig = FunctionSignature {
            name: "get".into(),
            identity: "pkg.Client.get".into(),
            is_async: false,
            is_classmethod: false,
            is_module_level: false,
            annotations: vec![],
            arguments: vec![
                Argument::new("self", ArgKind::Positional, None, DefaultValue::Missing).unwrap(),
                Argument::new("name", ArgKind::Positional, None, DefaultValue::Missing).unwrap(),
                Argument::new("limit", ArgKind::Positional, None, DefaultValue::value("10")).unwrap(),
            ],
            return_type: None,
            location: None,
        };
        let gaps = sig.type_gaps();
        assert_eq!(gaps.len(), 1);
        assert!(matches!(&gaps[0], StubError::UnresolvedType { parameter, .. } if parameter == "name"));
    }
}
