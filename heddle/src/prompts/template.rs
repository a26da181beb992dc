//! `{name}` placeholder templates.
//!
//! Syntax: `{name}` is replaced by the variable `name`; `{{` and `}}` produce literal braces
//! (so a JSON example inside a prompt is written `{{ "sentiment": "..." }}`). The template is
//! parsed once on construction; rendering is a pure substitution.

use std::collections::HashMap;

use thiserror::Error;

/// Store identifier of a prompt.
pub type PromptId = i64;

/// Name under which prompt `id` is exposed to step source text, e.g. `prompt1`.
pub fn binding_name(id: PromptId) -> String {
    format!("prompt{}", id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("prompt {id}: unclosed `{{` at byte {pos}")]
    Unclosed { id: PromptId, pos: usize },

    #[error("prompt {id}: unmatched `}}` at byte {pos} (write `}}}}` for a literal brace)")]
    UnmatchedClose { id: PromptId, pos: usize },

    #[error("prompt {id}: empty placeholder `{{}}` at byte {pos}")]
    EmptyPlaceholder { id: PromptId, pos: usize },

    #[error("prompt {id}: `{{` inside the placeholder opened at byte {pos}")]
    NestedOpen { id: PromptId, pos: usize },

    #[error("prompt {id}: no value for placeholder `{name}`")]
    MissingVariable { id: PromptId, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(String),
}

/// A parsed, immutable prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    id: PromptId,
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parses `source`. Fails on unbalanced braces, `{}`, or a `{` inside a placeholder.
    pub fn new(id: PromptId, source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let segments = parse(id, &source)?;
        Ok(Self {
            id,
            source,
            segments,
        })
    }

    pub fn id(&self) -> PromptId {
        self.id
    }

    /// The raw template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of first appearance.
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Var(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitutes every placeholder from `vars`. Extra variables are ignored.
    pub fn render(&self, vars: &HashMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Var(name) => {
                    let value = vars.get(name).ok_or_else(|| TemplateError::MissingVariable {
                        id: self.id,
                        name: name.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn parse(id: PromptId, source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(TemplateError::UnmatchedClose { id, pos }),
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) => return Err(TemplateError::NestedOpen { id, pos }),
                        Some((_, ch)) => name.push(ch),
                        None => return Err(TemplateError::Unclosed { id, pos }),
                    }
                }
                if name.is_empty() {
                    return Err(TemplateError::EmptyPlaceholder { id, pos });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Var(name));
            }
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
