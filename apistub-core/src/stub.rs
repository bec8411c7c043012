//! Stub generation driver
//!
//! Reads and parses every discovered module, resolves its callables against
//! the Python providers, and emits one token stream for the whole package with
//! checker findings attached to the elements they point at.

use crate::config::Config;
use crate::diagnostics::{Diagnostic, DiagnosticSet};
use crate::docstring::SphinxDocstring;
use crate::emit::{write_class_header, write_function, write_variable, RenderOptions, TokenWriter};
use crate::python::{module_name_for, parse_module, ClassElement, ModuleElement, ParsedModule};
use crate::resolve::{Resolution, SignatureResolver};
use crate::signature::VariableSignature;
use crate::source::{Callable, DocstringParser, ElementLocation, Sources};
use crate::token::RenderToken;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

/// A checker finding together with the element it was attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedDiagnostic {
    pub target_id: String,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

/// Review payload for one package
#[derive(Debug, Clone, Serialize)]
pub struct StubFile {
    pub name: String,
    pub language: String,
    pub package_name: String,
    /// Version of the generator that produced this file
    pub version_string: String,
    pub tokens: Vec<RenderToken>,
    pub diagnostics: Vec<AttachedDiagnostic>,
}

/// Tokens for one top-level element, kept apart until identities are checked
#[derive(Debug)]
struct EmittedElement {
    identity: String,
    tokens: Vec<RenderToken>,
    diagnostics: Vec<AttachedDiagnostic>,
    hidden: usize,
}

/// Per-element emission state
struct ElementWriter<'d> {
    writer: TokenWriter,
    findings: &'d DiagnosticSet,
    attached: Vec<AttachedDiagnostic>,
    hidden: usize,
}

impl<'d> ElementWriter<'d> {
    fn new(findings: &'d DiagnosticSet) -> Self {
        Self {
            writer: TokenWriter::new(),
            findings,
            attached: Vec::new(),
            hidden: 0,
        }
    }

    fn findings_for(&mut self, target_id: &str, location: Option<&ElementLocation>) -> Vec<&'d Diagnostic> {
        let findings: &'d DiagnosticSet = self.findings;
        let found = location
            .map(|loc| findings.for_element(loc))
            .unwrap_or_default();
        self.attached.extend(found.iter().map(|d| AttachedDiagnostic {
            target_id: target_id.to_string(),
            diagnostic: (*d).clone(),
        }));
        found
    }

    fn finish(self, identity: String) -> EmittedElement {
        EmittedElement {
            identity,
            tokens: self.writer.into_tokens(),
            diagnostics: self.attached,
            hidden: self.hidden,
        }
    }
}

pub struct StubGenerator {
    options: RenderOptions,
    diagnostics: DiagnosticSet,
    docstrings: SphinxDocstring,
}

impl StubGenerator {
    pub fn new(config: &Config, diagnostics: DiagnosticSet) -> Self {
        Self {
            options: RenderOptions::from(config),
            diagnostics,
            docstrings: SphinxDocstring,
        }
    }

    /// Generate the stub for `files`, all located under `package_root`.
    ///
    /// Unreadable files abort the run; callables that fail to resolve are
    /// left out and logged.
    pub fn generate(
        &self,
        package_name: &str,
        package_root: &Path,
        files: &[PathBuf],
    ) -> crate::Result<StubFile> {
        let base = if package_root.is_file() {
            package_root.parent().unwrap_or(Path::new(""))
        } else {
            package_root
        };

        let mut sorted: Vec<&PathBuf> = files.iter().collect();
        sorted.sort();

        let per_file: Vec<Vec<EmittedElement>> = sorted
            .par_iter()
            .map(|path| self.process_file(base, path))
            .collect::<crate::Result<_>>()?;

        let mut seen = HashSet::new();
        let mut tokens = Vec::new();
        let mut attached = Vec::new();
        let mut elements = 0usize;
        let mut hidden = 0usize;

        for element in per_file.into_iter().flatten() {
            hidden += element.hidden;
            if !seen.insert(element.identity.clone()) {
                warn!(identity = %element.identity, "Duplicate identity, dropping later element");
                continue;
            }
            elements += 1;
            tokens.extend(element.tokens);
            attached.extend(element.diagnostics);
        }

        info!(
            package = package_name,
            files = files.len(),
            elements,
            hidden,
            diagnostics = attached.len(),
            "Generated stub"
        );

        Ok(StubFile {
            name: package_name.to_string(),
            language: "Python".to_string(),
            package_name: package_name.to_string(),
            version_string: env!("CARGO_PKG_VERSION").to_string(),
            tokens,
            diagnostics: attached,
        })
    }

    fn process_file(&self, base: &Path, path: &Path) -> crate::Result<Vec<EmittedElement>> {
        let _span = info_span!("file", path = %path.display()).entered();

        let source = std::fs::read_to_string(path)?;
        let relative = path.strip_prefix(base).unwrap_or(path);
        let module_name = module_name_for(relative);
        let module = parse_module(path, &source, &module_name)?;

        let sources = Sources {
            declarations: &module,
            signatures: &module,
            docstrings: &self.docstrings,
            type_hints: &module,
        };
        let resolver = SignatureResolver::new(sources);

        let mut emitted = vec![self.module_header(&module)];
        let elements: Vec<EmittedElement> = module
            .elements
            .par_iter()
            .map(|element| match element {
                ModuleElement::Function(callable) => {
                    let mut out = ElementWriter::new(&self.diagnostics);
                    match self.write_callable(&mut out, &resolver, callable) {
                        Some(identity) => {
                            out.writer.add_newline();
                            out.finish(identity)
                        }
                        None => out.finish(callable.qualified_name()),
                    }
                }
                ModuleElement::Class(class) => self.emit_class(&resolver, class),
            })
            .collect();
        emitted.extend(elements);

        debug!(module = %module_name, elements = emitted.len(), "Emitted module");
        Ok(emitted)
    }

    fn module_header(&self, module: &ParsedModule) -> EmittedElement {
        let mut writer = TokenWriter::new();
        writer.add_line_anchor(&module.module_name);
        writer.add_keyword("namespace", false, true);
        writer.add_text(&module.module_name, Some(&module.module_name));
        writer.add_newline();
        writer.add_newline();
        EmittedElement {
            identity: format!("namespace {}", module.module_name),
            tokens: writer.into_tokens(),
            diagnostics: Vec::new(),
            hidden: 0,
        }
    }

    fn emit_class(&self, resolver: &SignatureResolver, class: &ClassElement) -> EmittedElement {
        let mut out = ElementWriter::new(&self.diagnostics);
        let identity = class.signature.identity.clone();

        let header_findings = out.findings_for(&identity, class.signature.location.as_ref());
        write_class_header(&mut out.writer, &class.signature, &header_findings);
        out.writer.begin_group();

        let mut variables = self.instance_variables(class);
        variables.extend(class.variables.iter().cloned());
        for variable in &variables {
            let findings = out.findings_for(&variable.identity, variable.location.as_ref());
            write_variable(&mut out.writer, variable, &findings);
        }
        if !variables.is_empty() {
            out.writer.add_newline();
        }

        let resolutions: Vec<Resolution> = class
            .methods
            .par_iter()
            .map(|method| resolver.resolve(method))
            .collect();
        for resolution in resolutions {
            match resolution {
                Resolution::Visible(signature) => {
                    let findings = out.findings_for(&signature.identity, signature.location.as_ref());
                    write_function(&mut out.writer, &signature, &findings, &self.options);
                    out.writer.add_newline();
                }
                Resolution::Hidden { .. } => out.hidden += 1,
            }
        }

        out.writer.end_group();
        out.writer.add_newline();
        out.finish(identity)
    }

    /// `:ivar:` entries documented on the class
    fn instance_variables(&self, class: &ClassElement) -> Vec<VariableSignature> {
        let Some(doc) = class.docstring.as_deref() else {
            return Vec::new();
        };
        self.docstrings
            .parse(doc)
            .ivars
            .into_iter()
            .map(|var| VariableSignature::new(&class.signature.identity, var.name, var.type_name, None, true))
            .collect()
    }

    /// Resolve and write one callable, returning its identity when visible
    fn write_callable(
        &self,
        out: &mut ElementWriter,
        resolver: &SignatureResolver,
        callable: &Callable,
    ) -> Option<String> {
        match resolver.resolve(callable) {
            Resolution::Visible(signature) => {
                let findings = out.findings_for(&signature.identity, signature.location.as_ref());
                write_function(&mut out.writer, &signature, &findings, &self.options);
                Some(signature.identity)
            }
            Resolution::Hidden { .. } => {
                out.hidden += 1;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::render_plain;
    use std::fs;
    use tempfile::TempDir;

    const MODELS: &str = r#"class Widget(object):
    """A widget.

    :ivar str name: Name of the widget.
    """

    DEFAULT_COLOR: str = "blue"

    def rename(self, name, *, force=False, **kwargs):
        """Rename.

        :param str name: New name.
        :keyword bool force: Overwrite. Default value is False.
        """
        pass
"#;

    const CLIENT: &str = r#"def create(name: str) -> "Widget":
    pass

def broken(a, $b):
    pass
"#;

    fn package() -> (TempDir, Vec<PathBuf>) {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("widget");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("_models.py"), MODELS).unwrap();
        fs::write(pkg.join("__init__.py"), CLIENT).unwrap();
        let files = vec![pkg.join("_models.py"), pkg.join("__init__.py")];
        (dir, files)
    }

    #[test]
    fn test_generate_orders_files_and_renders_members() {
        let (dir, files) = package();
        let generator = StubGenerator::new(&Config::default(), DiagnosticSet::default());
        let stub = generator.generate("widget", dir.path(), &files).unwrap();

        assert_eq!(stub.language, "Python");
        assert_eq!(stub.package_name, "widget");

        let text = render_plain(&stub.tokens);
        let init_pos = text.find("namespace widget\n").unwrap();
        let models_pos = text.find("namespace widget._models\n").unwrap();
        assert!(init_pos < models_pos);

        assert!(text.contains("def widget.create(name: str) -> \"Widget\"\n"));
        assert!(text.contains("class Widget(object):\n"));
        assert!(text.contains("    ivar name: str\n"));
        assert!(text.contains("    cvar DEFAULT_COLOR: str = \"blue\"\n"));
        assert!(text.contains("            force: bool = False, \n"));
    }

    #[test]
    fn test_generate_attaches_diagnostics() {
        let (dir, files) = package();
        let findings = DiagnosticSet::from_diagnostics(vec![Diagnostic {
            level: crate::diagnostics::DiagnosticLevel::Warning,
            message: "Use a tracing decorator.".to_string(),
            help_link: None,
            source_path: "widget/_models.py".to_string(),
            line: 9,
            column: 4,
            end_line: None,
            end_column: None,
            checker_code: "C4717".to_string(),
            symbol: None,
            obj: None,
        }]);
        let generator = StubGenerator::new(&Config::default(), findings);
        let stub = generator.generate("widget", dir.path(), &files).unwrap();

        assert_eq!(stub.diagnostics.len(), 1);
        assert_eq!(stub.diagnostics[0].target_id, "widget._models.Widget.rename");
        assert!(stub
            .tokens
            .iter()
            .any(|t| matches!(t, RenderToken::Diagnostic { target_id, .. } if target_id == "widget._models.Widget.rename")));
    }

    #[test]
    fn test_hidden_function_leaves_no_blank_line() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("m.py"),
            "def a(x):\n    pass\n\ndef broken(a, $b):\n    pass\n\ndef c(y):\n    pass\n",
        )
        .unwrap();
        let generator = StubGenerator::new(&Config::default(), DiagnosticSet::default());
        let stub = generator
            .generate("m", dir.path(), &[dir.path().join("m.py")])
            .unwrap();

        let text = render_plain(&stub.tokens);
        assert!(text.contains("def m.a(x)\n\ndef m.c(y)\n\n"));
        assert!(!text.contains("\n\n\n"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let generator = StubGenerator::new(&Config::default(), DiagnosticSet::default());
        let err = generator
            .generate("widget", dir.path(), &[dir.path().join("missing.py")])
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
