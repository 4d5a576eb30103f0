use super::QuestResource;
use crate::parser::{MessageNode, parse_message};
use crate::text::{Range, TextLine};

const PREVIEW_SENTINEL: &str = "<--->";
const ALIGNMENT_TAG: &str = "<ce>";
const ELLIPSIS: &str = " [...]";

/// A numbered or static message and the text lines it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    node: MessageNode,
    id: u32,
    body: Vec<String>,
}

impl Message {
    pub fn parse(line: &TextLine<'_>) -> Option<Self> {
        let node = parse_message(line)?;
        let id = node.id.value.parse().ok()?;
        Some(Self {
            node,
            id,
            body: Vec::new(),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn alias(&self) -> Option<&str> {
        self.node.alias.as_ref().map(|alias| alias.value.as_str())
    }

    pub fn node(&self) -> &MessageNode {
        &self.node
    }

    /// Raw body lines in document order.
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Range of the header's id token.
    pub fn id_range(&self) -> Range {
        self.node.id.range()
    }

    pub fn append_body_line(&mut self, line: &TextLine<'_>) {
        self.node.append_body_line(line);
        self.body.push(line.text.to_string());
    }

    /// True if `reference` names this message by id or alias.
    pub fn is_referenced_by(&self, reference: &str) -> bool {
        reference.parse::<u32>().is_ok_and(|id| id == self.id) || self.alias() == Some(reference)
    }

    /// Single-paragraph preview of the body.
    pub fn preview(&self, max_length: usize) -> String {
        Self::make_preview(&self.body, false, max_length)
    }

    /// Build a display preview from body lines.
    ///
    /// Lines are trimmed, a leading `<ce>` is dropped and blank lines are
    /// skipped. Collection stops at a `<--->` line. Text longer than
    /// `max_length` characters is cut, and `" [...]"` marks any preview that
    /// does not show the whole body.
    pub fn make_preview<S: AsRef<str>>(body: &[S], with_blank_line_separator: bool, max_length: usize) -> String {
        let separator = if with_blank_line_separator { "\n\n" } else { " " };
        let mut parts = Vec::new();
        let mut stopped_early = false;
        for (idx, line) in body.iter().enumerate() {
            let text = line.as_ref().trim();
            if text == PREVIEW_SENTINEL {
                stopped_early = body[idx + 1..].iter().any(|rest| !rest.as_ref().trim().is_empty());
                break;
            }
            let text = text.strip_prefix(ALIGNMENT_TAG).map_or(text, str::trim_start);
            if !text.is_empty() {
                parts.push(text);
            }
        }

        let mut preview = parts.join(separator);
        let mut truncated = false;
        if preview.chars().count() > max_length {
            preview = preview.chars().take(max_length).collect::<String>().trim_end().to_string();
            truncated = true;
        }
        if truncated || stopped_early {
            preview.push_str(ELLIPSIS);
        }
        preview
    }
}

impl QuestResource for Message {
    fn range(&self) -> Range {
        match &self.node.alias {
            Some(alias) => alias.range(),
            None => self.node.id.range(),
        }
    }

    fn block_range(&self) -> Range {
        match self.node.body_range {
            Some(body) => self.node.range.union(&body),
            None => self.node.range,
        }
    }
}
