//! Signature templates: the placeholder syntax shared by symbol definitions,
//! task headers, and action overloads.
//!
//! A template is a sequence of whitespace-separated words. Each word may mix
//! literal text with placeholders:
//!
//! - `${1:name}` captures one word whose parameter type is derived from `name`;
//! - `${1|a,b|}` accepts one of the listed alternatives;
//! - `${1:...name}` in the final word lets that word repeat to absorb any
//!   number of trailing words.
//!
//! A template is compiled into an anchored [`Regex`] that validates whole
//! lines, and can be zipped against the words of a matching line to produce
//! one typed [`Parameter`] per word.

use regex::Regex;
use variantly::Variantly;

use quest_data::SymbolType;

/// Errors raised while compiling a malformed template.
///
/// Templates come from catalogs, not from quest authors, so these are
/// configuration errors rather than diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("unterminated placeholder in template '{0}'")]
    UnbalancedPlaceholder(String),
    #[error("empty placeholder in template '{0}'")]
    EmptyPlaceholder(String),
    #[error("variadic placeholder must be the last placeholder of template '{0}'")]
    MisplacedVariadic(String),
    #[error("template compiled to an invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// The semantic type of a signature word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// Literal text or an enumerated alternation; carries no reference.
    Keyword,
    /// `dd`: a non-negative integer.
    NaturalNumber,
    /// `nn`: a possibly signed integer.
    Integer,
    /// `time`: a 24-hour `HH:MM` value.
    Time,
    /// `message`: a message id or alias.
    Message,
    /// `messageID`: a numeric message id.
    MessageId,
    /// `messageName`: a message alias.
    MessageName,
    Task,
    /// A symbol reference, optionally restricted to one symbol type.
    Symbol(Option<SymbolType>),
    QuestId,
    QuestName,
    /// Arbitrary text that is never validated.
    FreeText,
    /// A value from an external value table keyed by placeholder name.
    Attribute(String),
}

impl ParameterType {
    /// Derive a parameter type from a placeholder name.
    pub fn from_placeholder(name: &str) -> Self {
        match name {
            "dd" => ParameterType::NaturalNumber,
            "nn" => ParameterType::Integer,
            "time" | "hh:mm" => ParameterType::Time,
            "message" => ParameterType::Message,
            "messageID" => ParameterType::MessageId,
            "messageName" => ParameterType::MessageName,
            "task" => ParameterType::Task,
            "_symbol_" => ParameterType::Symbol(None),
            "_item_" => ParameterType::Symbol(Some(SymbolType::Item)),
            "_person_" => ParameterType::Symbol(Some(SymbolType::Person)),
            "_place_" => ParameterType::Symbol(Some(SymbolType::Place)),
            "_clock_" => ParameterType::Symbol(Some(SymbolType::Clock)),
            "_foe_" => ParameterType::Symbol(Some(SymbolType::Foe)),
            "questID" => ParameterType::QuestId,
            "questName" => ParameterType::QuestName,
            "varName" | "text" | "word" => ParameterType::FreeText,
            other => ParameterType::Attribute(other.to_string()),
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(
            self,
            ParameterType::Message | ParameterType::MessageId | ParameterType::MessageName
        )
    }

    pub fn is_quest(&self) -> bool {
        matches!(self, ParameterType::QuestId | ParameterType::QuestName)
    }
}

/// One word of a matched line paired with the type its template declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub kind: ParameterType,
    pub value: String,
}

impl Parameter {
    pub fn new(kind: ParameterType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Outcome of matching a definition line against its catalog.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum SignatureMatch {
    /// The catalog has nothing for this construct; nothing can be said.
    NotRecognized,
    /// The construct is known but the line fits none of its shapes.
    Invalid,
    Valid(Vec<Parameter>),
}

impl SignatureMatch {
    /// Parameters of a valid match, empty otherwise.
    pub fn parameters(&self) -> &[Parameter] {
        match self {
            SignatureMatch::Valid(parameters) => parameters,
            SignatureMatch::NotRecognized | SignatureMatch::Invalid => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Named { name: String, variadic: bool },
    Choice(Vec<String>),
}

/// A template word split into literal and placeholder segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateWord {
    text: String,
    segments: Vec<Segment>,
}

impl TemplateWord {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Type of the first named placeholder in the word; `Keyword` when there is none.
    pub fn parameter_type(&self) -> ParameterType {
        self.segments
            .iter()
            .find_map(|segment| match segment {
                Segment::Named { name, .. } => Some(ParameterType::from_placeholder(name)),
                _ => None,
            })
            .unwrap_or(ParameterType::Keyword)
    }

    pub fn is_variadic(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Named { variadic: true, .. }))
    }

    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    fn pattern(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(&regex::escape(text)),
                Segment::Named { .. } => out.push_str(r"[^\s]+"),
                Segment::Choice(options) => {
                    let options: Vec<String> = options.iter().map(|o| regex::escape(o)).collect();
                    out.push('(');
                    out.push_str(&options.join("|"));
                    out.push(')');
                },
            }
        }
        if self.is_variadic() {
            out.push_str(r"(\s+[^\s]+)*");
        }
        out
    }
}

/// Split a template into words, rejecting malformed placeholders.
pub fn template_words(template: &str) -> Result<Vec<TemplateWord>, TemplateError> {
    let mut words = Vec::new();
    for text in template.split_whitespace() {
        words.push(TemplateWord {
            text: text.to_string(),
            segments: parse_segments(text, template)?,
        });
    }

    let last_word = words.len().saturating_sub(1);
    for (idx, word) in words.iter().enumerate() {
        let variadic_positions: Vec<usize> = word
            .segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| matches!(segment, Segment::Named { variadic: true, .. }))
            .map(|(pos, _)| pos)
            .collect();
        let is_last_placeholder = |pos: usize| {
            !word.segments[pos + 1..]
                .iter()
                .any(|segment| !matches!(segment, Segment::Literal(_)))
        };
        if variadic_positions
            .iter()
            .any(|&pos| idx != last_word || !is_last_placeholder(pos))
        {
            return Err(TemplateError::MisplacedVariadic(template.to_string()));
        }
    }
    Ok(words)
}

/// Parameter type declared by one template word, e.g. `${2:_place_}` or `pc`.
///
/// # Errors
/// Returns a [`TemplateError`] if the word holds a malformed placeholder.
pub fn placeholder_type(word: &str) -> Result<ParameterType, TemplateError> {
    let segments = parse_segments(word, word)?;
    Ok(TemplateWord {
        text: word.to_string(),
        segments,
    }
    .parameter_type())
}

fn parse_segments(word: &str, template: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = word;
    while let Some(start) = rest.find("${") {
        if start > 0 {
            segments.push(Segment::Literal(rest[..start].to_string()));
        }
        let body_and_tail = &rest[start + 2..];
        let end = body_and_tail
            .find('}')
            .ok_or_else(|| TemplateError::UnbalancedPlaceholder(template.to_string()))?;
        segments.push(parse_placeholder(&body_and_tail[..end], template)?);
        rest = &body_and_tail[end + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    Ok(segments)
}

fn parse_placeholder(body: &str, template: &str) -> Result<Segment, TemplateError> {
    let rest = body.trim_start_matches(|c: char| c.is_ascii_digit());
    if let Some(name) = rest.strip_prefix(':') {
        let (name, variadic) = match name.strip_prefix("...") {
            Some(name) => (name, true),
            None => (name, false),
        };
        if name.is_empty() {
            return Err(TemplateError::EmptyPlaceholder(template.to_string()));
        }
        return Ok(Segment::Named {
            name: name.to_string(),
            variadic,
        });
    }
    if let Some(choices) = rest.strip_prefix('|').and_then(|s| s.strip_suffix('|')) {
        let options: Vec<String> = choices
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if options.is_empty() {
            return Err(TemplateError::EmptyPlaceholder(template.to_string()));
        }
        return Ok(Segment::Choice(options));
    }
    Err(TemplateError::EmptyPlaceholder(template.to_string()))
}

/// Compile a template into an anchored pattern that accepts whole lines.
///
/// # Errors
/// Returns a [`TemplateError`] if the template is malformed.
pub fn compile_to_pattern(template: &str) -> Result<Regex, TemplateError> {
    let words = template_words(template)?;
    Ok(Regex::new(&pattern_source(&words))?)
}

fn pattern_source(words: &[TemplateWord]) -> String {
    let body: Vec<String> = words.iter().map(TemplateWord::pattern).collect();
    format!(r"^\s*{}\s*$", body.join(r"\s+"))
}

/// Zip the words of a line against the words of a template.
///
/// A variadic final template word repeats to cover extra line words. Surplus
/// template words (a short line) produce nothing, so callers must treat a
/// parameter list shorter than the template as a mismatch.
///
/// # Errors
/// Returns a [`TemplateError`] if the template is malformed.
pub fn expand_against_line<S: AsRef<str>>(template: &str, line_words: &[S]) -> Result<Vec<Parameter>, TemplateError> {
    let words = template_words(template)?;
    Ok(zip_words(&words, line_words))
}

fn zip_words<S: AsRef<str>>(words: &[TemplateWord], line_words: &[S]) -> Vec<Parameter> {
    let types: Vec<ParameterType> = words.iter().map(TemplateWord::parameter_type).collect();
    let variadic = words.last().is_some_and(TemplateWord::is_variadic);
    let mut parameters = Vec::with_capacity(line_words.len());
    for (idx, value) in line_words.iter().enumerate() {
        let kind = match (types.get(idx), types.last()) {
            (Some(kind), _) => kind.clone(),
            (None, Some(last)) if variadic => last.clone(),
            _ => break,
        };
        parameters.push(Parameter::new(kind, value.as_ref()));
    }
    parameters
}

/// A template compiled once and reused for every line tested against it.
#[derive(Debug, Clone)]
pub struct SignatureTemplate {
    source: String,
    words: Vec<TemplateWord>,
    pattern: Regex,
}

impl PartialEq for SignatureTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl SignatureTemplate {
    /// # Errors
    /// Returns a [`TemplateError`] if the template is malformed.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        let words = template_words(template)?;
        let pattern = Regex::new(&pattern_source(&words))?;
        Ok(Self {
            source: template.to_string(),
            words,
            pattern,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn words(&self) -> &[TemplateWord] {
        &self.words
    }

    /// Leading literal words, e.g. `start timer` for `start timer ${1:_clock_}`.
    pub fn literal_prefix(&self) -> Vec<&str> {
        self.words
            .iter()
            .take_while(|word| word.is_literal())
            .map(TemplateWord::text)
            .collect()
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Zip `line_words` against this template; see [`expand_against_line`].
    pub fn expand<S: AsRef<str>>(&self, line_words: &[S]) -> Vec<Parameter> {
        zip_words(&self.words, line_words)
    }

    /// Expand only if `line` matches the template as a whole.
    pub fn match_line(&self, line: &str) -> Option<Vec<Parameter>> {
        if !self.is_match(line) {
            return None;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        Some(self.expand(&words))
    }
}
