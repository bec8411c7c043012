//! Diagnostic mapper: normalizes pylint JSON findings and attaches them to
//! code elements by source file and first line.

use crate::source::ElementLocation;
use crate::StubError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, error};

fn help_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(.+) See details: *([^\s]+)").expect("valid help link regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

impl DiagnosticLevel {
    /// `E` (error) and `F` (fatal) checker codes are errors, everything else warns
    pub fn from_checker_code(code: &str) -> Self {
        match code.chars().next() {
            Some('E' | 'F') => Self::Error,
            _ => Self::Warning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// One record of pylint's `-f json` output
#[derive(Debug, Clone, Deserialize)]
pub struct CheckerRecord {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub obj: Option<String>,
    pub line: usize,
    pub column: usize,
    #[serde(rename = "endLine", default)]
    pub end_line: Option<usize>,
    #[serde(rename = "endColumn", default)]
    pub end_column: Option<usize>,
    pub path: String,
    #[serde(default)]
    pub symbol: Option<String>,
    pub message: String,
    #[serde(rename = "message-id")]
    pub message_id: String,
}

/// A normalized checker finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_link: Option<String>,
    /// Relative to the analyzed package root
    pub source_path: String,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
    pub checker_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obj: Option<String>,
}

impl Diagnostic {
    pub fn from_record(record: CheckerRecord, package_root: &str) -> Self {
        let source_path = strip_package_root(&record.path, package_root);
        let (message, help_link) = split_help_link(&record.message);
        Self {
            level: DiagnosticLevel::from_checker_code(&record.message_id),
            message,
            help_link,
            source_path,
            line: record.line,
            column: record.column,
            end_line: record.end_line,
            end_column: record.end_column,
            checker_code: record.message_id,
            symbol: record.symbol,
            obj: record.obj,
        }
    }
}

/// Lookup key for a code element: `(source_path, start_line, end_line)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRange<'a> {
    pub source_path: &'a str,
    pub start_line: usize,
    pub end_line: usize,
}

impl<'a> From<&'a ElementLocation> for TargetRange<'a> {
    fn from(location: &'a ElementLocation) -> Self {
        Self {
            source_path: &location.source_file,
            start_line: location.start_line,
            end_line: location.end_line(),
        }
    }
}

/// Findings loaded once per run and looked up by element
#[derive(Debug, Default)]
pub struct DiagnosticSet {
    items: Vec<Diagnostic>,
}

impl DiagnosticSet {
    /// Parse checker output, keeping only the custom checker `family`
    /// (characters 2-3 of the message id).
    pub fn load(checker_output: &str, package_root: &str, family: &str) -> crate::Result<Self> {
        // The checker may print stray exception lines into stdout
        let json: String = checker_output
            .lines()
            .filter(|line| !line.starts_with("Exception"))
            .collect::<Vec<_>>()
            .join("\n");

        let records: Vec<CheckerRecord> = serde_json::from_str(&json).map_err(|e| {
            error!(error = %e, "Error decoding checker JSON");
            StubError::MalformedCheckerOutput(e.to_string())
        })?;

        let total = records.len();
        let items: Vec<Diagnostic> = records
            .into_iter()
            .filter(|r| r.message_id.get(1..3) == Some(family))
            .map(|r| Diagnostic::from_record(r, package_root))
            .collect();
        debug!(total, retained = items.len(), family, "Loaded checker output");

        Ok(Self { items })
    }

    pub fn from_diagnostics(items: Vec<Diagnostic>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Findings for an element: same source file (suffix match) and anchored
    /// exactly on the element's first line.
    pub fn for_element(&self, location: &ElementLocation) -> Vec<&Diagnostic> {
        let target = TargetRange::from(location);
        self.items
            .iter()
            .filter(|d| target.source_path.ends_with(d.source_path.as_str()))
            .filter(|d| d.line == target.start_line)
            .collect()
    }
}

/// Strip a leading `<package_root>` plus the path separator after it
fn strip_package_root(path: &str, package_root: &str) -> String {
    let normalized = path.replace('\\', "/");
    if package_root.is_empty() {
        return normalized;
    }
    match normalized.strip_prefix(package_root) {
        Some(rest) => rest.strip_prefix('/').unwrap_or(rest).to_string(),
        None => normalized,
    }
}

/// Split `"<text> See details: <url>"` into message and help link
fn split_help_link(message: &str) -> (String, Option<String>) {
    match help_link_regex().captures(message) {
        Some(caps) => (caps[1].to_string(), Some(caps[2].to_string())),
        None => (message.to_string(), None),
    }
}
