//! Error types for apistub operations

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StubError {
    /// No declaration could be recovered for the callable (e.g. a builtin).
    /// The callable degrades to an empty signature.
    #[error("Opaque callable {0}: no declaration available")]
    OpaqueCallable(String),

    /// Decoration or signature text could not be parsed. The element is hidden.
    #[error("Malformed declaration for {identity}: {message}")]
    MalformedDeclaration { identity: String, message: String },

    /// Checker records are not valid structured data. Fatal for the run.
    #[error("Malformed checker output: {0}")]
    MalformedCheckerOutput(String),

    /// No source supplied a type for a required parameter.
    #[error("Unresolved type for parameter '{parameter}' of {identity}")]
    UnresolvedType { identity: String, parameter: String },

    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Glob pattern error: {0}")]
    GlobPattern(String),

    #[error("Tree-sitter parse error for {}: {message}", .path.display())]
    TreeSitterParse { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StubError {
    /// Whether this error must abort the whole run rather than a single element.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::OpaqueCallable(_)
                | Self::MalformedDeclaration { .. }
                | Self::UnresolvedType { .. }
                | Self::InvalidArgument { .. }
        )
    }
}
