//! Chat prompt templates.
//!
//! Templates use `{name}` placeholders; `{{` and `}}` produce literal braces.
//! Templates are parsed once, when the prompt is built.

use std::collections::{BTreeSet, HashMap};
use tandem_core::ChatMessage;

use crate::error::{LlmError, LlmResult};

/// Role of a templated message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    System,
    Human,
    Ai,
}

impl PromptRole {
    /// Parse the role names accepted by [`ChatPromptTemplate::from_messages`]
    pub fn parse(role: &str) -> LlmResult<Self> {
        match role {
            "system" => Ok(Self::System),
            "human" | "user" => Ok(Self::Human),
            "ai" | "assistant" => Ok(Self::Ai),
            other => Err(LlmError::invalid_template(format!(
                "unknown message role '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A single parsed template string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template string
    pub fn parse(template: &str) -> LlmResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') | None => {
                                return Err(LlmError::invalid_template(format!(
                                    "unclosed placeholder in '{}'",
                                    template
                                )));
                            }
                            Some(c) => name.push(c),
                        }
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(LlmError::invalid_template(format!(
                            "empty placeholder in '{}'",
                            template
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(name.to_string()));
                }
                '}' => {
                    return Err(LlmError::invalid_template(format!(
                        "unmatched '}}' in '{}'",
                        template
                    )));
                }
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Names of the placeholders, in order of first use
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder
    pub fn format(&self, vars: &HashMap<String, String>) -> LlmResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = vars.get(name).ok_or_else(|| LlmError::MissingVariable {
                        name: name.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// An ordered list of role-tagged message templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPromptTemplate {
    messages: Vec<(PromptRole, PromptTemplate)>,
}

impl ChatPromptTemplate {
    /// Build from `(role, template)` pairs, e.g. `("system", "...")`
    pub fn from_messages<I, R, T>(messages: I) -> LlmResult<Self>
    where
        I: IntoIterator<Item = (R, T)>,
        R: AsRef<str>,
        T: AsRef<str>,
    {
        let messages = messages
            .into_iter()
            .map(|(role, template)| {
                Ok((
                    PromptRole::parse(role.as_ref())?,
                    PromptTemplate::parse(template.as_ref())?,
                ))
            })
            .collect::<LlmResult<Vec<_>>>()?;

        Ok(Self { messages })
    }

    /// All placeholder names used by the prompt
    pub fn input_variables(&self) -> BTreeSet<&str> {
        self.messages
            .iter()
            .flat_map(|(_, template)| template.variables())
            .collect()
    }

    /// Render the prompt into chat messages
    pub fn format_messages<I, K, V>(&self, vars: I) -> LlmResult<Vec<ChatMessage>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        self.messages
            .iter()
            .map(|(role, template)| {
                let content = template.format(&vars)?;
                Ok(match role {
                    PromptRole::System => ChatMessage::system(content),
                    PromptRole::Human => ChatMessage::human(content),
                    PromptRole::Ai => ChatMessage::ai(content),
                })
            })
            .collect()
    }
}
