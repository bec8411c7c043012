//! Signature resolution: merge declaration, signature, docstring and type-hint
//! metadata into one canonical [`FunctionSignature`].
//!
//! Resolution runs a fixed sequence of [`MergePass`]es over a mutable
//! [`SignatureDraft`]. Each pass has a [`MergePolicy`]:
//!
//! - Declaration and Signature *establish* values (identity, modifiers,
//!   arguments, the native return annotation).
//! - Docstring *fills* only what is still unset, and never touches a required
//!   keyword-only argument.
//! - TypeHint *overrides* the return type whenever the extractor yields one,
//!   except for async callables that already have a return type.
//!
//! The draft is then finalized into the canonical argument order:
//! `[cls] positional... [* keyword-only (sorted)...] [**kwargs]`.

use crate::argument::{ArgKind, Argument, DefaultValue};
use crate::signature::FunctionSignature;
use crate::source::{
    Callable, Declaration, IntrospectedSignature, Namespace, ParamKind, ParsedDocstring, Sources,
};
use crate::StubError;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Outcome of resolving one callable
#[derive(Debug)]
pub enum Resolution {
    Visible(FunctionSignature),
    /// Excluded from rendering; the rest of the run continues
    Hidden { identity: String, reason: StubError },
}

impl Resolution {
    pub fn visible(self) -> Option<FunctionSignature> {
        match self {
            Self::Visible(sig) => Some(sig),
            Self::Hidden { .. } => None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden { .. })
    }
}

/// How a pass treats values already present in the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Sets values on an empty draft
    Establish,
    /// Writes a field only when it is still unset
    FillIfUnset,
    /// Replaces the field whenever the source has a value
    Override,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePass {
    Declaration,
    Signature,
    Docstring,
    TypeHint,
}

impl MergePass {
    pub const ORDER: [MergePass; 4] = [
        MergePass::Declaration,
        MergePass::Signature,
        MergePass::Docstring,
        MergePass::TypeHint,
    ];

    pub fn policy(self) -> MergePolicy {
        match self {
            Self::Declaration | Self::Signature => MergePolicy::Establish,
            Self::Docstring => MergePolicy::FillIfUnset,
            Self::TypeHint => MergePolicy::Override,
        }
    }
}

/// Mutable-until-finalized record the merge passes write into
#[derive(Debug, Clone, Default)]
pub struct SignatureDraft {
    pub name: String,
    pub identity: String,
    pub is_async: bool,
    pub is_classmethod: bool,
    pub is_module_level: bool,
    pub annotations: Vec<String>,
    /// Positional, variadic and (synthetic) `cls` arguments in declaration order
    pub positional: Vec<Argument>,
    /// Keyword-only arguments, held aside until finalization
    pub keyword_only: BTreeMap<String, Argument>,
    pub return_type: Option<String>,
    /// Set when no declaration was available; no further passes run
    pub opaque: bool,
}

impl SignatureDraft {
    pub fn new(callable: &Callable) -> Self {
        Self {
            name: callable.name.clone(),
            identity: callable.qualified_name(),
            is_module_level: callable.is_module_level,
            ..Default::default()
        }
    }

    /// Declaration pass: async-ness, decorators, synthetic `cls`
    pub fn apply_declaration(&mut self, declaration: &Declaration) {
        self.is_async = declaration.is_async;
        if self.is_async {
            // Keeps sync and async variants of the same method distinct
            self.identity.push_str(":async");
        }
        self.annotations = declaration
            .decorators
            .iter()
            .map(|d| format!("@{}", d))
            .collect();
        self.is_classmethod = declaration.decorators.iter().any(|d| d == "classmethod");
        if self.is_classmethod {
            self.positional.insert(0, Argument::cls());
        }
    }

    /// Signature pass: classify introspected parameters and take the native
    /// return annotation.
    ///
    /// Parameters are reported as declared, so a classmethod's first
    /// parameter is its class receiver and is replaced by the synthetic `cls`.
    pub fn apply_signature(
        &mut self,
        signature: &IntrospectedSignature,
        namespace: &Namespace,
    ) -> crate::Result<()> {
        let mut params = signature.parameters.iter().peekable();
        if self.is_classmethod {
            let _receiver = params.next_if(|p| {
                matches!(p.kind, ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword)
            });
        }

        let mut seen: HashSet<String> = self
            .positional
            .iter()
            .map(|a| a.lookup_key().to_string())
            .collect();
        for param in params {
            if !seen.insert(param.name.clone()) {
                return Err(StubError::MalformedDeclaration {
                    identity: self.identity.clone(),
                    message: format!("duplicate parameter '{}'", param.name),
                });
            }

            let declared_type = param.annotation.as_deref().map(|a| namespace.qualify(a));
            let kind = match param.kind {
                ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword => ArgKind::Positional,
                ParamKind::VarPositional => ArgKind::VarPositional,
                ParamKind::KeywordOnly => ArgKind::KeywordOnly,
                ParamKind::VarKeyword => ArgKind::VarKeyword,
            };
            let arg = Argument::new(&param.name, kind, declared_type, param.default.clone())?;

            if kind == ArgKind::KeywordOnly {
                self.keyword_only.insert(arg.name.clone(), arg);
            } else {
                self.positional.push(arg);
            }
        }

        if let Some(annotation) = &signature.return_annotation {
            self.return_type = Some(namespace.qualify(annotation));
        }
        Ok(())
    }

    /// Docstring pass. Never overwrites a value already present, so applying
    /// the same documentation twice is a no-op.
    pub fn merge_docstring(&mut self, doc: &ParsedDocstring) {
        if self.return_type.is_none() {
            if let Some(ret_type) = &doc.ret_type {
                debug!(function = %self.name, "Setting return type from docstring");
                self.return_type = Some(ret_type.clone());
            }
        }

        for arg in &mut self.positional {
            if let Some(doc_arg) = doc.pos_args.get(arg.lookup_key()) {
                fill_unset(arg, doc_arg.declared_type.as_ref(), &doc_arg.default);
            }
        }

        for (name, arg) in &mut self.keyword_only {
            if arg.is_required {
                continue;
            }
            if let Some(doc_arg) = doc.kw_args.get(name) {
                fill_unset(arg, doc_arg.declared_type.as_ref(), &doc_arg.default);
            }
        }

        // Keywords only described in the documentation
        for (name, doc_arg) in &doc.kw_args {
            if self.keyword_only.contains_key(name)
                || self.positional.iter().any(|a| a.lookup_key() == name)
            {
                continue;
            }
            self.keyword_only.insert(
                name.clone(),
                Argument::from_docstring(name, doc_arg.declared_type.clone(), doc_arg.default.clone()),
            );
        }
    }

    /// Whether the type-hint pass applies at all
    pub fn accepts_type_hint(&self) -> bool {
        !(self.is_async && self.return_type.is_some())
    }

    /// Type-hint pass: a present hint replaces the current return type,
    /// including one taken from a signature annotation.
    pub fn merge_type_hint(&mut self, hint: Option<String>) {
        if !self.accepts_type_hint() {
            return;
        }
        if let Some(ret_type) = hint {
            self.return_type = Some(ret_type);
        }
    }

    /// Produce the canonical signature in final argument order
    pub fn finalize(self) -> FunctionSignature {
        let mut arguments = self.positional;

        let var_keyword = arguments
            .iter()
            .position(|a| a.kind == ArgKind::VarKeyword)
            .map(|idx| arguments.remove(idx));

        if !self.keyword_only.is_empty() {
            arguments.push(Argument::separator());
            // BTreeMap iteration is already sorted by name
            arguments.extend(self.keyword_only.into_values());
        }

        if let Some(kwargs) = var_keyword {
            arguments.push(kwargs);
        }

        FunctionSignature {
            name: self.name,
            identity: self.identity,
            is_async: self.is_async,
            is_classmethod: self.is_classmethod,
            is_module_level: self.is_module_level,
            annotations: self.annotations,
            arguments,
            return_type: self.return_type,
            location: None,
        }
    }
}

fn fill_unset(
    arg: &mut Argument,
    declared_type: Option<&String>,
    default: &DefaultValue,
) {
    if arg.declared_type.is_none() {
        arg.declared_type = declared_type.cloned();
    }
    if arg.default_value.is_missing() && !arg.kind.is_variadic() {
        arg.default_value = default.clone();
    }
}

/// Resolves callables against a fixed set of metadata providers
pub struct SignatureResolver<'a> {
    sources: Sources<'a>,
}

impl<'a> SignatureResolver<'a> {
    pub fn new(sources: Sources<'a>) -> Self {
        Self { sources }
    }

    /// Resolve one callable. Failures are isolated to this callable and turn
    /// it into [`Resolution::Hidden`].
    pub fn resolve(&self, callable: &Callable) -> Resolution {
        debug!(function = %callable.name, namespace = %callable.namespace.path, "Processing function");

        match self.run_passes(callable) {
            Ok(draft) => {
                let mut signature = draft.finalize();
                signature.location = callable.location.clone();
                for gap in signature.type_gaps() {
                    debug!("{}", gap);
                }
                Resolution::Visible(signature)
            }
            Err(reason) => {
                let identity = callable.qualified_name();
                warn!(%identity, error = %reason, "Hiding callable");
                Resolution::Hidden { identity, reason }
            }
        }
    }

    fn run_passes(&self, callable: &Callable) -> crate::Result<SignatureDraft> {
        let mut draft = SignatureDraft::new(callable);
        for pass in MergePass::ORDER {
            if draft.opaque {
                break;
            }
            self.apply(pass, callable, &mut draft)?;
        }
        Ok(draft)
    }

    fn apply(
        &self,
        pass: MergePass,
        callable: &Callable,
        draft: &mut SignatureDraft,
    ) -> crate::Result<()> {
        match pass {
            MergePass::Declaration => match self.sources.declarations.declaration(callable)? {
                Some(declaration) => draft.apply_declaration(&declaration),
                None => {
                    debug!("{}", StubError::OpaqueCallable(callable.qualified_name()));
                    draft.opaque = true;
                }
            },
            MergePass::Signature => {
                let signature = self.sources.signatures.signature(callable)?;
                draft.apply_signature(&signature, &callable.namespace)?;
            }
            MergePass::Docstring => {
                if let Some(text) = callable.documentation() {
                    let parsed = self.sources.docstrings.parse(text);
                    draft.merge_docstring(&parsed);
                }
            }
            MergePass::TypeHint => {
                if draft.accepts_type_hint() {
                    draft.merge_type_hint(self.sources.type_hints.return_type(callable));
                }
            }
        }
        Ok(())
    }
}
