//! Metadata sources consumed by the signature resolver
//!
//! The resolver never inspects code directly. A callable is identified by a
//! [`Callable`] handle and everything known about it comes from four
//! providers: declaration metadata, signature introspection, the docstring
//! parser and the type-hint extractor.

use crate::argument::DefaultValue;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

/// Location of a code element in its source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementLocation {
    /// Path of the source file, forward-slash separated
    pub source_file: String,
    /// First physical line (1-indexed), decorators included
    pub start_line: usize,
    pub line_count: usize,
}

impl ElementLocation {
    pub fn new(source_file: impl Into<String>, start_line: usize, line_count: usize) -> Self {
        Self {
            source_file: source_file.into().replace('\\', "/"),
            start_line,
            line_count: line_count.max(1),
        }
    }

    pub fn end_line(&self) -> usize {
        self.start_line + self.line_count - 1
    }
}

/// Enclosing namespace of a callable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    /// Dotted path, e.g. `azure.storage.blob.BlobClient`
    pub path: String,
    /// Type names declared directly in this namespace's module
    pub local_types: BTreeSet<String>,
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"~?[A-Za-z_][\w.]*").expect("valid identifier regex"))
}

impl Namespace {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            local_types: BTreeSet::new(),
        }
    }

    pub fn with_local_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.local_types.extend(types.into_iter().map(Into::into));
        self
    }

    /// Module part of the path (everything before a trailing class name)
    pub fn module_path(&self) -> &str {
        match self.path.rsplit_once('.') {
            Some((module, last)) if self.local_types.contains(last) => module,
            _ => &self.path,
        }
    }

    /// Qualify bare type names declared in this namespace's module.
    ///
    /// Already-dotted names and unknown identifiers are left as written.
    pub fn qualify(&self, annotation: &str) -> String {
        if self.local_types.is_empty() {
            return annotation.to_string();
        }
        let module = self.module_path();
        identifier_regex()
            .replace_all(annotation, |caps: &Captures| {
                let ident = &caps[0];
                if !ident.contains('.') && self.local_types.contains(ident) {
                    format!("{}.{}", module, ident)
                } else {
                    ident.to_string()
                }
            })
            .into_owned()
    }
}

/// Handle to one callable discovered by the module walker
#[derive(Debug, Clone)]
pub struct Callable {
    pub name: String,
    pub namespace: Arc<Namespace>,
    pub is_module_level: bool,
    pub docstring: Option<String>,
    /// Docstring of the enclosing class, consulted for undocumented constructors
    pub parent_docstring: Option<String>,
    pub location: Option<ElementLocation>,
}

impl Callable {
    pub fn new(name: impl Into<String>, namespace: Arc<Namespace>) -> Self {
        Self {
            name: name.into(),
            namespace,
            is_module_level: false,
            docstring: None,
            parent_docstring: None,
            location: None,
        }
    }

    /// `<namespace>.<name>`, the key providers use to find this callable
    pub fn qualified_name(&self) -> String {
        if self.namespace.path.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace.path, self.name)
        }
    }

    /// Documentation used for merging: own docstring, or the class docstring
    /// for an undocumented `__init__`.
    pub fn documentation(&self) -> Option<&str> {
        let own = self.docstring.as_deref().filter(|d| !d.trim().is_empty());
        match own {
            Some(doc) => Some(doc),
            None if self.name == "__init__" => self
                .parent_docstring
                .as_deref()
                .filter(|d| !d.trim().is_empty()),
            None => None,
        }
    }
}

/// Structured declaration metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    pub is_async: bool,
    /// Decorator names as written, without `@`, in source order
    pub decorators: Vec<String>,
}

/// Native parameter kind reported by introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    pub annotation: Option<String>,
    pub default: DefaultValue,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            annotation: None,
            default: DefaultValue::Missing,
        }
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = DefaultValue::Value(default.into());
        self
    }
}

/// Parameters and return annotation as reported by introspection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntrospectedSignature {
    pub parameters: Vec<Parameter>,
    pub return_annotation: Option<String>,
}

/// Per-name documentation of one argument
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocArg {
    pub declared_type: Option<String>,
    pub default: DefaultValue,
}

/// Instance variable documented with `:ivar:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocVariable {
    pub name: String,
    pub type_name: Option<String>,
}

/// Structured result of parsing prose documentation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocstring {
    pub pos_args: BTreeMap<String, DocArg>,
    pub kw_args: BTreeMap<String, DocArg>,
    pub ret_type: Option<String>,
    pub ivars: Vec<DocVariable>,
}

/// Supplies `{is_async, decorator_names}` for a callable.
///
/// `Ok(None)` means no declaration is retrievable (an opaque callable).
pub trait DeclarationProvider: Send + Sync {
    fn declaration(&self, callable: &Callable) -> crate::Result<Option<Declaration>>;
}

/// Reports ordered parameters and the return annotation of a callable
pub trait SignatureProvider: Send + Sync {
    fn signature(&self, callable: &Callable) -> crate::Result<IntrospectedSignature>;
}

/// Parses prose documentation into per-argument metadata
pub trait DocstringParser: Send + Sync {
    fn parse(&self, text: &str) -> ParsedDocstring;
}

/// Extracts a resolved return type from type hints
pub trait TypeHintProvider: Send + Sync {
    fn return_type(&self, callable: &Callable) -> Option<String>;
}

/// The providers a resolver draws from
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    pub declarations: &'a dyn DeclarationProvider,
    pub signatures: &'a dyn SignatureProvider,
    pub docstrings: &'a dyn DocstringParser,
    pub type_hints: &'a dyn TypeHintProvider,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_local_types() {
        let ns = Namespace::new("azure.chat.ChatClient").with_local_types(["ChatClient", "ChatThreadInfo"]);
        assert_eq!(ns.module_path(), "azure.chat");
        assert_eq!(
            ns.qualify("ItemPaged[ChatThreadInfo]"),
            "ItemPaged[azure.chat.ChatThreadInfo]"
        );
        assert_eq!(ns.qualify("azure.core.ChatThreadInfo"), "azure.core.ChatThreadInfo");
        assert_eq!(ns.qualify("Optional[str]"), "Optional[str]");
    }

    #[test]
    fn test_qualify_without_local_types() {
        let ns = Namespace::new("pkg");
        assert_eq!(ns.qualify("Dict[str, Any]"), "Dict[str, Any]");
    }

    #[test]
    fn test_init_falls_back_to_class_doc() {
        let mut init = Callable::new("__init__", Arc::new(Namespace::new("pkg.Client")));
        init.parent_docstring = Some(":param str endpoint: The endpoint.".to_string());
        assert_eq!(init.documentation(), Some(":param str endpoint: The endpoint."));

        let mut other = Callable::new("close", Arc::new(Namespace::new("pkg.Client")));
        other.parent_docstring = Some("class doc".to_string());
        assert_eq!(other.documentation(), None);
    }

    #[test]
    fn test_location_normalizes_separators() {
        let loc = ElementLocation::new("pkg\\sub\\mod.py", 10, 3);
        assert_eq!(loc.source_file, "pkg/sub/mod.py");
        assert_eq!(loc.end_line(), 12);
    }
}
