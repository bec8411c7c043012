//! Python module walker built on tree-sitter
//!
//! Extracts the public surface of one module (functions, classes, methods and
//! class variables) and records, per callable, the facts the resolver's
//! providers hand out: declaration metadata, declared parameters and the
//! `# type:` comment hint.

use crate::argument::DefaultValue;
use crate::signature::{ClassSignature, VariableSignature};
use crate::source::{
    Callable, Declaration, DeclarationProvider, ElementLocation, IntrospectedSignature, Namespace,
    ParamKind, Parameter, SignatureProvider, TypeHintProvider,
};
use crate::StubError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use tree_sitter::Node;

/// A class and its public members
#[derive(Debug, Clone)]
pub struct ClassElement {
    pub signature: ClassSignature,
    pub namespace: Arc<Namespace>,
    pub docstring: Option<String>,
    pub variables: Vec<VariableSignature>,
    pub methods: Vec<Callable>,
}

#[derive(Debug, Clone)]
pub enum ModuleElement {
    Function(Callable),
    Class(ClassElement),
}

/// What the source says about one definition
#[derive(Debug, Clone)]
struct DefinitionFacts {
    declaration: Declaration,
    /// `Err` carries the reason the definition could not be parsed
    signature: std::result::Result<IntrospectedSignature, String>,
    type_comment: Option<String>,
}

/// One parsed module: its elements in source order plus the facts backing the
/// metadata providers
#[derive(Debug)]
pub struct ParsedModule {
    pub module_name: String,
    pub namespace: Arc<Namespace>,
    pub elements: Vec<ModuleElement>,
    facts: HashMap<String, DefinitionFacts>,
}

impl ParsedModule {
    pub fn callables(&self) -> impl Iterator<Item = &Callable> {
        self.elements.iter().flat_map(|element| match element {
            ModuleElement::Function(callable) => std::slice::from_ref(callable).iter(),
            ModuleElement::Class(class) => class.methods.iter(),
        })
    }
}

impl DeclarationProvider for ParsedModule {
    fn declaration(&self, callable: &Callable) -> crate::Result<Option<Declaration>> {
        Ok(self
            .facts
            .get(&callable.qualified_name())
            .map(|facts| facts.declaration.clone()))
    }
}

impl SignatureProvider for ParsedModule {
    fn signature(&self, callable: &Callable) -> crate::Result<IntrospectedSignature> {
        let identity = callable.qualified_name();
        match self.facts.get(&identity).map(|facts| &facts.signature) {
            Some(Ok(signature)) => Ok(signature.clone()),
            Some(Err(message)) => Err(StubError::MalformedDeclaration {
                identity,
                message: message.clone(),
            }),
            None => Ok(IntrospectedSignature::default()),
        }
    }
}

impl TypeHintProvider for ParsedModule {
    fn return_type(&self, callable: &Callable) -> Option<String> {
        self.facts
            .get(&callable.qualified_name())
            .and_then(|facts| facts.type_comment.as_deref())
            .and_then(type_comment_return)
    }
}

/// Dotted module name for a file relative to the package root
/// (`azure/widget/_client.py` -> `azure.widget._client`, `__init__.py` names its package)
pub fn module_name_for(relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if let Some(last) = parts.pop() {
        let stem = last.strip_suffix(".py").unwrap_or(&last).to_string();
        if stem != "__init__" {
            parts.push(stem);
        }
    }
    parts.join(".")
}

/// Parse a Python module and collect its public elements
pub fn parse_module(path: &Path, source: &str, module_name: &str) -> crate::Result<ParsedModule> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| StubError::TreeSitterParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| StubError::TreeSitterParse {
            path: path.to_path_buf(),
            message: "parser returned no tree".to_string(),
        })?;
    let root = tree.root_node();
    let source_file = path.to_string_lossy().replace('\\', "/");

    // Classes declared in this module qualify bare annotations
    let local_types: Vec<String> = named_children(&root)
        .filter_map(|stmt| definition_of(&stmt))
        .filter(|def| def.kind() == "class_definition")
        .filter_map(|def| field_text(&def, "name", source))
        .collect();
    let module_ns = Arc::new(Namespace::new(module_name).with_local_types(local_types.clone()));

    let mut walker = ModuleWalker {
        source,
        source_file: &source_file,
        facts: HashMap::new(),
    };
    let mut elements = Vec::new();

    for stmt in named_children(&root) {
        let Some(def) = definition_of(&stmt) else {
            continue;
        };
        let Some(name) = field_text(&def, "name", source) else {
            continue;
        };
        if !is_public(&name) {
            continue;
        }
        match def.kind() {
            "function_definition" => {
                let mut callable = walker.function(&stmt, &def, name, &module_ns, None);
                callable.is_module_level = true;
                push_unique_function(&mut elements, callable);
            }
            "class_definition" => {
                let class_ns = Arc::new(
                    Namespace::new(format!("{}.{}", module_name, name))
                        .with_local_types(local_types.clone()),
                );
                let class = walker.class(&stmt, &def, name, &module_ns, class_ns);
                elements.push(ModuleElement::Class(class));
            }
            _ => {}
        }
    }

    debug!(module = module_name, elements = elements.len(), "Parsed module");

    Ok(ParsedModule {
        module_name: module_name.to_string(),
        namespace: module_ns,
        elements,
        facts: walker.facts,
    })
}

/// Later definitions of a name replace earlier ones, as at import time
fn push_unique_function(elements: &mut Vec<ModuleElement>, callable: Callable) {
    elements.retain(|e| !matches!(e, ModuleElement::Function(f) if f.name == callable.name));
    elements.push(ModuleElement::Function(callable));
}

struct ModuleWalker<'s> {
    source: &'s str,
    source_file: &'s str,
    facts: HashMap<String, DefinitionFacts>,
}

impl<'s> ModuleWalker<'s> {
    fn function(
        &mut self,
        stmt: &Node,
        def: &Node,
        name: String,
        namespace: &Arc<Namespace>,
        parent_docstring: Option<&str>,
    ) -> Callable {
        let mut callable = Callable::new(name, Arc::clone(namespace));
        callable.docstring = body_docstring(def, self.source);
        callable.parent_docstring = parent_docstring.map(String::from);
        callable.location = Some(self.location(stmt));

        let facts = DefinitionFacts {
            declaration: Declaration {
                is_async: is_async_definition(def),
                decorators: decorator_names(stmt, self.source),
            },
            signature: if stmt.has_error() {
                Err(format!(
                    "syntax error in definition at line {}",
                    stmt.start_position().row + 1
                ))
            } else {
                introspect_parameters(def, self.source)
            },
            type_comment: type_comment(def, self.source),
        };
        self.facts.insert(callable.qualified_name(), facts);
        callable
    }

    fn class(
        &mut self,
        stmt: &Node,
        def: &Node,
        name: String,
        module_ns: &Namespace,
        class_ns: Arc<Namespace>,
    ) -> ClassElement {
        let identity = class_ns.path.clone();
        let bases = def
            .child_by_field_name("superclasses")
            .map(|args| {
                named_children(&args)
                    .filter(|arg| arg.kind() != "keyword_argument")
                    .map(|arg| module_ns.qualify(&node_text(&arg, self.source)))
                    .collect()
            })
            .unwrap_or_default();
        let docstring = body_docstring(def, self.source);

        let mut methods: Vec<Callable> = Vec::new();
        let mut variables = Vec::new();

        if let Some(body) = def.child_by_field_name("body") {
            for member in named_children(&body) {
                if member.kind() == "expression_statement" {
                    if let Some(variable) = self.class_variable(&member, &identity) {
                        variables.push(variable);
                    }
                    continue;
                }
                let Some(member_def) = definition_of(&member) else {
                    continue;
                };
                if member_def.kind() != "function_definition" {
                    continue;
                }
                let Some(method_name) = field_text(&member_def, "name", self.source) else {
                    continue;
                };
                if !is_public(&method_name) {
                    continue;
                }
                // A property setter/deleter keeps the getter as the rendered API
                if methods.iter().any(|m| m.name == method_name)
                    && is_property_accessor(&member, &method_name, self.source)
                {
                    continue;
                }
                let method = self.function(
                    &member,
                    &member_def,
                    method_name,
                    &class_ns,
                    docstring.as_deref(),
                );
                methods.retain(|m| m.name != method.name);
                methods.push(method);
            }
        }

        ClassElement {
            signature: ClassSignature {
                name,
                identity,
                bases,
                location: Some(self.location(stmt)),
            },
            namespace: class_ns,
            docstring,
            variables,
            methods,
        }
    }

    /// `NAME = value` / `NAME: T = value` in a class body
    fn class_variable(&self, stmt: &Node, class_identity: &str) -> Option<VariableSignature> {
        let assignment = named_children(stmt).find(|n| n.kind() == "assignment")?;
        let left = assignment.child_by_field_name("left")?;
        if left.kind() != "identifier" {
            return None;
        }
        let name = node_text(&left, self.source);
        if name.starts_with('_') {
            return None;
        }
        let type_name = field_text(&assignment, "type", self.source);
        let value = field_text(&assignment, "right", self.source);
        let mut variable = VariableSignature::new(class_identity, name, type_name, value, false);
        variable.location = Some(self.location(stmt));
        Some(variable)
    }

    fn location(&self, node: &Node) -> ElementLocation {
        let start = node.start_position().row + 1;
        let end = node.end_position().row + 1;
        ElementLocation::new(self.source_file, start, end - start + 1)
    }
}

fn is_public(name: &str) -> bool {
    !name.starts_with('_') || name == "__init__"
}

/// The function/class definition a statement declares, looking through decorators
fn definition_of<'t>(stmt: &Node<'t>) -> Option<Node<'t>> {
    match stmt.kind() {
        "function_definition" | "class_definition" => Some(*stmt),
        "decorated_definition" => stmt.child_by_field_name("definition"),
        _ => None,
    }
}

fn is_async_definition(def: &Node) -> bool {
    let mut cursor = def.walk();
    let is_async = def.children(&mut cursor).any(|c| c.kind() == "async");
    is_async
}

/// `@<name>.setter` or `@<name>.deleter` on a redefinition of property `name`
fn is_property_accessor(stmt: &Node, name: &str, source: &str) -> bool {
    decorator_names(stmt, source).iter().any(|d| {
        d.strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|accessor| accessor == "setter" || accessor == "deleter")
    })
}

/// Decorator names in source order; calls are reduced to their callee
fn decorator_names(stmt: &Node, source: &str) -> Vec<String> {
    if stmt.kind() != "decorated_definition" {
        return Vec::new();
    }
    named_children(stmt)
        .filter(|c| c.kind() == "decorator")
        .filter_map(|decorator| decorator.named_child(0))
        .map(|expr| match expr.kind() {
            "call" => expr
                .child_by_field_name("function")
                .map(|f| node_text(&f, source))
                .unwrap_or_else(|| node_text(&expr, source)),
            _ => node_text(&expr, source),
        })
        .collect()
}

/// Parameters as declared, in order
fn introspect_parameters(
    def: &Node,
    source: &str,
) -> std::result::Result<IntrospectedSignature, String> {
    let params = def
        .child_by_field_name("parameters")
        .ok_or_else(|| "missing parameter list".to_string())?;
    let return_annotation = field_text(def, "return_type", source);

    let mut parameters = Vec::new();
    let mut keyword_only = false;
    let mut seen_positional_separator = false;

    for node in named_children(&params) {
        match node.kind() {
            "identifier" => parameters.push(Parameter::new(
                node_text(&node, source),
                positional_kind(keyword_only),
            )),
            "typed_parameter" => {
                let inner = node
                    .named_child(0)
                    .ok_or_else(|| "typed parameter without name".to_string())?;
                let mut param = splat_or_named(&inner, source, keyword_only)?;
                if let Some(ty) = field_text(&node, "type", source) {
                    param = param.annotated(ty);
                }
                if param.kind == ParamKind::VarPositional {
                    keyword_only = true;
                }
                parameters.push(param);
            }
            "default_parameter" | "typed_default_parameter" => {
                let name = field_text(&node, "name", source)
                    .ok_or_else(|| "default parameter without name".to_string())?;
                let value = field_text(&node, "value", source)
                    .ok_or_else(|| format!("parameter '{}' has no default value", name))?;
                let mut param = Parameter::new(name, positional_kind(keyword_only)).with_default(value);
                if let Some(ty) = field_text(&node, "type", source) {
                    param = param.annotated(ty);
                }
                parameters.push(param);
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                let param = splat_or_named(&node, source, keyword_only)?;
                if param.kind == ParamKind::VarPositional {
                    keyword_only = true;
                }
                parameters.push(param);
            }
            "keyword_separator" => keyword_only = true,
            "positional_separator" => {
                if seen_positional_separator {
                    return Err("duplicate '/' separator".to_string());
                }
                seen_positional_separator = true;
                for param in parameters.iter_mut() {
                    if param.kind == ParamKind::PositionalOrKeyword {
                        param.kind = ParamKind::PositionalOnly;
                    }
                }
            }
            "comment" => {}
            other => return Err(format!("unsupported parameter node '{}'", other)),
        }
    }

    Ok(IntrospectedSignature {
        parameters,
        return_annotation,
    })
}

fn positional_kind(keyword_only: bool) -> ParamKind {
    if keyword_only {
        ParamKind::KeywordOnly
    } else {
        ParamKind::PositionalOrKeyword
    }
}

fn splat_or_named(
    node: &Node,
    source: &str,
    keyword_only: bool,
) -> std::result::Result<Parameter, String> {
    let kind = match node.kind() {
        "list_splat_pattern" => ParamKind::VarPositional,
        "dictionary_splat_pattern" => ParamKind::VarKeyword,
        "identifier" => return Ok(Parameter::new(node_text(node, source), positional_kind(keyword_only))),
        other => return Err(format!("unsupported parameter node '{}'", other)),
    };
    let name = node
        .named_child(0)
        .map(|n| node_text(&n, source))
        .ok_or_else(|| "splat parameter without name".to_string())?;
    Ok(Parameter {
        name,
        kind,
        annotation: None,
        default: DefaultValue::Missing,
    })
}

/// First `# type:` comment between the signature and the first body statement
fn type_comment(def: &Node, source: &str) -> Option<String> {
    let is_type_comment = |n: &Node| {
        n.kind() == "comment" && node_text(n, source).trim_start_matches('#').trim().starts_with("type:")
    };

    let mut cursor = def.walk();
    if let Some(comment) = def.children(&mut cursor).find(|c| is_type_comment(c)) {
        return Some(node_text(&comment, source));
    }

    let body = def.child_by_field_name("body")?;
    let mut cursor = body.walk();
    let found = body
        .children(&mut cursor)
        .take_while(|c| c.kind() == "comment")
        .find(|c| is_type_comment(c))
        .map(|c| node_text(&c, source));
    found
}

/// Return type of a `# type: (...) -> T` comment
pub fn type_comment_return(comment: &str) -> Option<String> {
    let hint = comment.trim_start_matches('#').trim().strip_prefix("type:")?;
    let (_, ret) = hint.rsplit_once("->")?;
    let ret = ret.trim();
    if ret.is_empty() {
        None
    } else {
        Some(ret.to_string())
    }
}

/// Docstring of a function or class body, cleaned of quotes and indentation
fn body_docstring(def: &Node, source: &str) -> Option<String> {
    let body = def.child_by_field_name("body")?;
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string = first.named_child(0)?;
    if string.kind() != "string" {
        return None;
    }
    Some(clean_docstring(&node_text(&string, source)))
}

/// Strip string prefix and quotes, then remove common leading indentation
pub fn clean_docstring(literal: &str) -> String {
    let body = literal.trim_start_matches(|c: char| "rRuUbBfF".contains(c));
    let body = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|q| body.strip_prefix(q).and_then(|b| b.strip_suffix(q)))
        .unwrap_or(body);

    let mut lines = body.lines();
    let first = lines.next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned = vec![first];
    cleaned.extend(rest.iter().map(|l| l.get(indent..).unwrap_or("").trim_end().to_string()));
    cleaned.join("\n").trim().to_string()
}

fn named_children<'t>(node: &Node<'t>) -> impl Iterator<Item = Node<'t>> {
    let node = *node;
    (0..node.named_child_count()).filter_map(move |i| node.named_child(i))
}

fn field_text(node: &Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field).map(|n| node_text(&n, source))
}

fn node_text(node: &Node, source: &str) -> String {
    source[node.start_byte()..node.end_byte()].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT: &str = r#"
from typing import Any, Optional


class Widget:
    """A widget.

    :ivar str name: Name of the widget.
    """

    MAX_SIZE: int = 1024
    _private = 1


class WidgetClient(ClientBase, metaclass=Meta):
    """Client for widgets.

    :param str endpoint: Service endpoint.
    """

    def __init__(self, endpoint: str, credential, **kwargs) -> None:
        pass

    @distributed_trace
    def get_widget(self, name: str, *, etag: Optional[str] = None, **kwargs: Any) -> Widget:
        """Get a widget."""
        pass

    @classmethod
    def from_connection_string(cls, conn_str, /, *args, timeout=30):
        pass

    async def close(self):
        # type: () -> None
        pass

    def _helper(self):
        pass


def create_widget(name, *, size: int = 5):
    pass
"#;

    fn parse() -> ParsedModule {
        parse_module(Path::new("azure/widget/_client.py"), CLIENT, "azure.widget._client").unwrap()
    }

    fn class<'a>(module: &'a ParsedModule, name: &str) -> &'a ClassElement {
        module
            .elements
            .iter()
            .find_map(|e| match e {
                ModuleElement::Class(c) if c.signature.name == name => Some(c),
                _ => None,
            })
            .unwrap()
    }

    fn method<'a>(module: &'a ParsedModule, class_name: &str, name: &str) -> &'a Callable {
        class(module, class_name).methods.iter().find(|m| m.name == name).unwrap()
    }

    #[test]
    fn test_module_name_for() {
        assert_eq!(module_name_for(Path::new("azure/widget/_client.py")), "azure.widget._client");
        assert_eq!(module_name_for(Path::new("azure/widget/__init__.py")), "azure.widget");
    }

    #[test]
    fn test_elements_in_source_order() {
        let module = parse();
        let names: Vec<String> = module
            .elements
            .iter()
            .map(|e| match e {
                ModuleElement::Function(f) => f.name.clone(),
                ModuleElement::Class(c) => c.signature.name.clone(),
            })
            .collect();
        assert_eq!(names, vec!["Widget", "WidgetClient", "create_widget"]);

        let methods: Vec<&str> = class(&module, "WidgetClient").methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(methods, vec!["__init__", "get_widget", "from_connection_string", "close"]);
    }

    #[test]
    fn test_class_header_and_variables() {
        let module = parse();
        let client = class(&module, "WidgetClient");
        assert_eq!(client.signature.identity, "azure.widget._client.WidgetClient");
        assert_eq!(client.signature.bases, vec!["ClientBase"]);

        let widget = class(&module, "Widget");
        assert_eq!(widget.variables.len(), 1);
        assert_eq!(widget.variables[0].identity, "azure.widget._client.Widget.MAX_SIZE(int)");
        assert_eq!(widget.variables[0].value.as_deref(), Some("1024"));
        assert!(widget.docstring.as_deref().unwrap().starts_with("A widget."));
    }

    #[test]
    fn test_declaration_facts() {
        let module = parse();
        let get = method(&module, "WidgetClient", "get_widget");
        let decl = module.declaration(get).unwrap().unwrap();
        assert_eq!(decl.decorators, vec!["distributed_trace"]);
        assert!(!decl.is_async);
        assert_eq!(get.location.as_ref().unwrap().start_line, 24);

        let close = method(&module, "WidgetClient", "close");
        assert!(module.declaration(close).unwrap().unwrap().is_async);
        assert_eq!(module.return_type(close).as_deref(), Some("None"));
    }

    #[test]
    fn test_introspected_parameters() {
        let module = parse();
        let get = method(&module, "WidgetClient", "get_widget");
        let sig = module.signature(get).unwrap();
        let kinds: Vec<(&str, ParamKind)> = sig.parameters.iter().map(|p| (p.name.as_str(), p.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("self", ParamKind::PositionalOrKeyword),
                ("name", ParamKind::PositionalOrKeyword),
                ("etag", ParamKind::KeywordOnly),
                ("kwargs", ParamKind::VarKeyword),
            ]
        );
        assert_eq!(sig.parameters[2].annotation.as_deref(), Some("Optional[str]"));
        assert_eq!(sig.parameters[2].default, DefaultValue::value("None"));
        assert_eq!(sig.parameters[3].annotation.as_deref(), Some("Any"));
        assert_eq!(sig.return_annotation.as_deref(), Some("Widget"));

        let from_conn = method(&module, "WidgetClient", "from_connection_string");
        let sig = module.signature(from_conn).unwrap();
        let kinds: Vec<(&str, ParamKind)> = sig.parameters.iter().map(|p| (p.name.as_str(), p.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("cls", ParamKind::PositionalOnly),
                ("conn_str", ParamKind::PositionalOnly),
                ("args", ParamKind::VarPositional),
                ("timeout", ParamKind::KeywordOnly),
            ]
        );
    }

    #[test]
    fn test_init_inherits_class_docstring() {
        let module = parse();
        let init = method(&module, "WidgetClient", "__init__");
        assert_eq!(init.docstring, None);
        assert!(init.documentation().unwrap().contains(":param str endpoint:"));
    }

    #[test]
    fn test_module_level_function() {
        let module = parse();
        let create = module.callables().find(|c| c.name == "create_widget").unwrap();
        assert!(create.is_module_level);
        assert_eq!(create.qualified_name(), "azure.widget._client.create_widget");
    }

    #[test]
    fn test_syntax_error_marks_definition_malformed() {
        let source = "def fine(a):\n    pass\n\ndef broken(a, $b):\n    pass\n";
        let module = parse_module(Path::new("m.py"), source, "m").unwrap();
        let fine = module.callables().find(|c| c.name == "fine").unwrap();
        assert!(module.signature(fine).is_ok());
        if let Some(broken) = module.callables().find(|c| c.name == "broken") {
            assert!(matches!(
                module.signature(broken),
                Err(StubError::MalformedDeclaration { .. })
            ));
        };
    }

    #[test]
    fn test_property_setter_keeps_getter() {
        let source = r#"class Blob(object):
    @property
    def name(self) -> str:
        pass

    @name.setter
    def name(self, value):
        pass

    @name.deleter
    def name(self):
        pass
"#;
        let module = parse_module(Path::new("blob.py"), source, "blob").unwrap();
        let blob = class(&module, "Blob");
        assert_eq!(blob.methods.len(), 1);

        let getter = &blob.methods[0];
        assert_eq!(getter.location.as_ref().unwrap().start_line, 2);
        let decl = module.declaration(getter).unwrap().unwrap();
        assert_eq!(decl.decorators, vec!["property"]);
        let sig = module.signature(getter).unwrap();
        assert_eq!(sig.parameters.len(), 1);
        assert_eq!(sig.return_annotation.as_deref(), Some("str"));
    }

    #[test]
    fn test_type_comment_return() {
        assert_eq!(type_comment_return("# type: (str, int) -> Dict[str, Any]").as_deref(), Some("Dict[str, Any]"));
        assert_eq!(type_comment_return("# type: ignore"), None);
        assert_eq!(type_comment_return("# a normal comment -> x"), None);
    }

    #[test]
    fn test_clean_docstring() {
        let literal = "\"\"\"Summary line.\n\n        :param str name: The name.\n        \"\"\"";
        assert_eq!(clean_docstring(literal), "Summary line.\n\n:param str name: The name.");
        assert_eq!(clean_docstring("r'raw'"), "raw");
    }
}
