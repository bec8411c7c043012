//! Sphinx-style docstring parser
//!
//! Understands the reST field lists used by Azure SDK packages:
//! `:param [type] name:`, `:type name:`, `:keyword [type] name:`,
//! `:paramtype name:`, `:rtype:`, `:ivar [type] name:` and `:vartype name:`.
//! Defaults are read from "Default value is X." phrases in descriptions.

use crate::argument::DefaultValue;
use crate::source::{DocArg, DocVariable, DocstringParser, ParsedDocstring};
use regex::Regex;
use std::sync::OnceLock;

fn field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^:(\w+)([^:]*):(.*)$").expect("valid field regex"))
}

fn default_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:Default value is|Defaults to)\s+(.+?)\.?(?:\s|$)").expect("valid default regex")
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SphinxDocstring;

/// One `:<tag> <args>: <body>` field with continuation lines folded in
#[derive(Debug, PartialEq, Eq)]
struct Field {
    tag: String,
    args: Vec<String>,
    body: String,
}

impl Field {
    /// `(type, name)` from `:tag [type words...] name:`
    fn typed_name(&self) -> Option<(Option<String>, String)> {
        let (name, type_words) = self.args.split_last()?;
        let declared_type = if type_words.is_empty() {
            None
        } else {
            Some(type_words.join(" "))
        };
        Some((declared_type, name.clone()))
    }

    fn name(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }

    fn body_type(&self) -> Option<String> {
        let body = self.body.trim();
        (!body.is_empty()).then(|| body.to_string())
    }

    fn default_value(&self) -> DefaultValue {
        default_regex()
            .captures(&self.body)
            .map(|caps| DefaultValue::value(&caps[1]))
            .unwrap_or_default()
    }
}

fn fields(text: &str) -> Vec<Field> {
    let mut fields: Vec<Field> = Vec::new();
    let mut in_field = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            in_field = false;
            continue;
        }
        if let Some(caps) = field_regex().captures(trimmed) {
            fields.push(Field {
                tag: caps[1].to_string(),
                args: caps[2].split_whitespace().map(String::from).collect(),
                body: caps[3].trim().to_string(),
            });
            in_field = true;
        } else if in_field {
            if let Some(field) = fields.last_mut() {
                if !field.body.is_empty() {
                    field.body.push(' ');
                }
                field.body.push_str(trimmed);
            }
        }
    }

    fields
}

/// Type assigned to an entry, keeping any type given inline
fn set_type(arg: &mut DocArg, declared_type: Option<String>) {
    if arg.declared_type.is_none() {
        arg.declared_type = declared_type;
    }
}

impl DocstringParser for SphinxDocstring {
    fn parse(&self, text: &str) -> ParsedDocstring {
        let mut doc = ParsedDocstring::default();
        let mut ivar_types: Vec<(String, String)> = Vec::new();

        for field in fields(text) {
            match field.tag.as_str() {
                "param" | "parameter" | "arg" => {
                    let Some((declared_type, name)) = field.typed_name() else {
                        continue;
                    };
                    let entry = doc.pos_args.entry(name).or_default();
                    set_type(entry, declared_type);
                    if entry.default.is_missing() {
                        entry.default = field.default_value();
                    }
                }
                "keyword" | "kwarg" | "kwparam" => {
                    let Some((declared_type, name)) = field.typed_name() else {
                        continue;
                    };
                    let entry = doc.kw_args.entry(name).or_default();
                    set_type(entry, declared_type);
                    if entry.default.is_missing() {
                        entry.default = field.default_value();
                    }
                }
                "type" => {
                    if let Some(name) = field.name() {
                        let entry = doc.pos_args.entry(name.to_string()).or_default();
                        set_type(entry, field.body_type());
                    }
                }
                "paramtype" => {
                    if let Some(name) = field.name() {
                        let entry = doc.kw_args.entry(name.to_string()).or_default();
                        set_type(entry, field.body_type());
                    }
                }
                "rtype" => {
                    if doc.ret_type.is_none() {
                        doc.ret_type = field.body_type();
                    }
                }
                "ivar" => {
                    if let Some((type_name, name)) = field.typed_name() {
                        if !doc.ivars.iter().any(|v| v.name == name) {
                            doc.ivars.push(DocVariable { name, type_name });
                        }
                    }
                }
                "vartype" => {
                    if let (Some(name), Some(type_name)) = (field.name(), field.body_type()) {
                        ivar_types.push((name.to_string(), type_name));
                    }
                }
                _ => {}
            }
        }

        for (name, type_name) in ivar_types {
            match doc.ivars.iter_mut().find(|v| v.name == name) {
                Some(var) if var.type_name.is_none() => var.type_name = Some(type_name),
                Some(_) => {}
                None => doc.ivars.push(DocVariable {
                    name,
                    type_name: Some(type_name),
                }),
            }
        }

        doc
    }
}
