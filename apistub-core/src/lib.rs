//! apistub core - API review stubs for Python packages
//!
//! Resolves every public callable of a package into a canonical signature by
//! merging declaration, signature, docstring and type-hint metadata, then
//! serializes the result into the render-token stream of the review viewer
//! with pylint findings attached.

pub mod argument;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod docstring;
pub mod emit;
pub mod error;
pub mod python;
pub mod resolve;
pub mod signature;
pub mod source;
pub mod stub;
pub mod token;

pub use argument::{ArgKind, Argument, DefaultValue};
pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticLevel, DiagnosticSet, TargetRange};
pub use discovery::discover_sources;
pub use docstring::SphinxDocstring;
pub use emit::{emit_function, emit_variable, shorten_type, RenderOptions, TokenWriter};
pub use error::StubError;
pub use python::{parse_module, ParsedModule};
pub use resolve::{MergePass, MergePolicy, Resolution, SignatureDraft, SignatureResolver};
pub use signature::{ClassSignature, FunctionSignature, VariableSignature};
pub use source::{Callable, ElementLocation, Namespace, Sources};
pub use stub::{AttachedDiagnostic, StubFile, StubGenerator};
pub use token::{render_plain, RenderToken};

/// Result type alias for apistub operations
pub type Result<T> = std::result::Result<T, StubError>;
