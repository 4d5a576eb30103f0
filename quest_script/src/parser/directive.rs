use crate::text::{QuestToken, Range, TextLine};

/// `Name: value` line from the preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveNode {
    pub name: QuestToken,
    pub content: QuestToken,
    pub range: Range,
}

/// Parse a `Name: value` directive; the name must be a single word.
pub fn parse_directive(line: &TextLine<'_>) -> Option<DirectiveNode> {
    let trimmed = line.trimmed();
    let (name, value) = trimmed.split_once(':')?;
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(DirectiveNode {
        name: line.token_for(name),
        content: line.token_for(value),
        range: line.trimmed_range(),
    })
}
