//! Token emitter: turns canonical signatures into render tokens

use crate::argument::Argument;
use crate::config::Config;
use crate::diagnostics::Diagnostic;
use crate::signature::{ClassSignature, FunctionSignature, VariableSignature};
use crate::token::RenderToken;
use regex::Regex;
use std::sync::OnceLock;

/// Matches dotted, optionally `~`-prefixed names and captures the last component,
/// e.g. `~azure.core.paging.ItemPaged` -> `ItemPaged`
fn long_type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"((?:~?)[\w.]+\.+([\w]+))").expect("valid type regex"))
}

/// Shorten every qualified name in a type expression to its final component.
///
/// Applied textually, so generic parameters are simplified too:
/// `~azure.core.paging.ItemPaged.ItemPaged[~azure.chat.ChatThreadInfo]`
/// becomes `ItemPaged[ChatThreadInfo]`.
pub fn shorten_type(long_type: &str) -> String {
    long_type_regex().replace_all(long_type, "$2").into_owned()
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Argument count above which parameters go one per line
    pub multiline_threshold: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            multiline_threshold: 2,
        }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            multiline_threshold: config.render.multiline_threshold,
        }
    }
}

/// Appends tokens with the spacing conventions of the review viewer
#[derive(Debug, Default)]
pub struct TokenWriter {
    tokens: Vec<RenderToken>,
}

impl TokenWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_tokens(self) -> Vec<RenderToken> {
        self.tokens
    }

    pub fn tokens(&self) -> &[RenderToken] {
        &self.tokens
    }

    pub fn add_whitespace(&mut self) {
        self.tokens.push(RenderToken::Whitespace);
    }

    pub fn add_newline(&mut self) {
        self.tokens.push(RenderToken::Newline);
    }

    pub fn add_keyword(&mut self, keyword: &str, prefix_space: bool, postfix_space: bool) {
        self.spaced(prefix_space, postfix_space, RenderToken::Keyword {
            value: keyword.to_string(),
        });
    }

    pub fn add_punctuation(&mut self, value: &str, prefix_space: bool, postfix_space: bool) {
        self.spaced(prefix_space, postfix_space, RenderToken::Punctuation {
            value: value.to_string(),
        });
    }

    pub fn add_text(&mut self, value: &str, definition_id: Option<&str>) {
        self.tokens.push(RenderToken::Text {
            value: value.to_string(),
            definition_id: definition_id.map(String::from),
        });
    }

    /// Type reference, shortened for display
    pub fn add_type(&mut self, type_name: &str) {
        self.tokens.push(RenderToken::TypeReference {
            value: shorten_type(type_name),
        });
    }

    pub fn add_line_anchor(&mut self, id: &str) {
        self.tokens.push(RenderToken::LineAnchor { id: id.to_string() });
    }

    pub fn begin_group(&mut self) {
        self.tokens.push(RenderToken::GroupBegin);
    }

    pub fn end_group(&mut self) {
        self.tokens.push(RenderToken::GroupEnd);
    }

    pub fn add_diagnostic(&mut self, target_id: &str, diagnostic: &Diagnostic) {
        self.tokens.push(RenderToken::diagnostic(target_id, diagnostic));
    }

    fn spaced(&mut self, prefix_space: bool, postfix_space: bool, token: RenderToken) {
        if prefix_space {
            self.add_whitespace();
        }
        self.tokens.push(token);
        if postfix_space {
            self.add_whitespace();
        }
    }
}

/// Emit the full token sequence for one function
pub fn emit_function(
    signature: &FunctionSignature,
    diagnostics: &[&Diagnostic],
    options: &RenderOptions,
) -> Vec<RenderToken> {
    let mut writer = TokenWriter::new();
    write_function(&mut writer, signature, diagnostics, options);
    writer.into_tokens()
}

pub fn write_function(
    writer: &mut TokenWriter,
    signature: &FunctionSignature,
    diagnostics: &[&Diagnostic],
    options: &RenderOptions,
) {
    for annotation in &signature.annotations {
        writer.add_whitespace();
        writer.add_keyword(annotation, false, false);
        writer.add_newline();
    }

    writer.add_whitespace();
    writer.add_line_anchor(&signature.identity);
    if signature.is_async {
        writer.add_keyword("async", false, true);
    }
    writer.add_keyword("def", false, true);
    writer.add_text(signature.display_name(), Some(&signature.identity));

    let multi_line = signature.arguments.len() > options.multiline_threshold;
    write_arguments(writer, signature, multi_line);

    if let Some(return_type) = &signature.return_type {
        writer.add_punctuation("->", true, true);
        if multi_line {
            writer.add_line_anchor(&format!("{}.returntype", signature.identity));
        }
        writer.add_type(return_type);
    }
    writer.add_newline();

    for diagnostic in diagnostics {
        writer.add_diagnostic(&signature.identity, diagnostic);
    }
}

fn write_arguments(writer: &mut TokenWriter, signature: &FunctionSignature, multi_line: bool) {
    writer.add_punctuation("(", false, false);
    // Two groups: one indents the parameters, the outer one the closing paren
    if multi_line {
        writer.begin_group();
        writer.begin_group();
    }

    let count = signature.arguments.len();
    for (index, arg) in signature.arguments.iter().enumerate() {
        if multi_line {
            writer.add_newline();
            writer.add_whitespace();
        }
        write_argument(writer, arg, &signature.identity, multi_line);
        if index + 1 < count {
            writer.add_punctuation(",", false, true);
        }
    }

    if multi_line {
        writer.add_newline();
        writer.end_group();
        writer.add_whitespace();
        writer.add_punctuation(")", false, false);
        writer.end_group();
    } else {
        writer.add_punctuation(")", false, false);
    }
}

fn write_argument(writer: &mut TokenWriter, arg: &Argument, function_id: &str, line_anchor: bool) {
    if line_anchor {
        writer.add_line_anchor(&format!("{}.param({})", function_id, arg.name));
    }
    writer.add_text(&arg.name, None);
    if let Some(declared_type) = &arg.declared_type {
        writer.add_punctuation(":", false, true);
        writer.add_type(declared_type);
    }
    if let Some(default) = arg.default_value.as_deref() {
        writer.add_punctuation("=", true, true);
        writer.add_text(default, None);
    }
}

/// Emit the token sequence for a class or instance variable
pub fn emit_variable(variable: &VariableSignature, diagnostics: &[&Diagnostic]) -> Vec<RenderToken> {
    let mut writer = TokenWriter::new();
    write_variable(&mut writer, variable, diagnostics);
    writer.into_tokens()
}

pub fn write_variable(
    writer: &mut TokenWriter,
    variable: &VariableSignature,
    diagnostics: &[&Diagnostic],
) {
    writer.add_whitespace();
    writer.add_keyword(if variable.is_ivar { "ivar" } else { "cvar" }, false, true);
    writer.add_line_anchor(&variable.identity);
    writer.add_text(&variable.name, Some(&variable.identity));
    if let Some(type_name) = &variable.type_name {
        writer.add_punctuation(":", false, true);
        writer.add_type(type_name);
    }
    if let Some(value) = &variable.value {
        writer.add_punctuation("=", true, true);
        let is_unquoted_str = variable.type_name.as_deref() == Some("str")
            && !(value.starts_with('"') || value.starts_with('\''));
        if is_unquoted_str {
            writer.add_text(&format!("\"{}\"", value), None);
        } else {
            writer.add_text(value, None);
        }
    }
    writer.add_newline();

    for diagnostic in diagnostics {
        writer.add_diagnostic(&variable.identity, diagnostic);
    }
}

/// `class Name(Base, ...):` followed by a newline
pub fn write_class_header(
    writer: &mut TokenWriter,
    class: &ClassSignature,
    diagnostics: &[&Diagnostic],
) {
    writer.add_whitespace();
    writer.add_line_anchor(&class.identity);
    writer.add_keyword("class", false, true);
    writer.add_text(&class.name, Some(&class.identity));
    if !class.bases.is_empty() {
        writer.add_punctuation("(", false, false);
        for (index, base) in class.bases.iter().enumerate() {
            if index > 0 {
                writer.add_punctuation(",", false, true);
            }
            writer.add_type(base);
        }
        writer.add_punctuation(")", false, false);
    }
    writer.add_punctuation(":", false, false);
    writer.add_newline();

    for diagnostic in diagnostics {
        writer.add_diagnostic(&class.identity, diagnostic);
    }
}
