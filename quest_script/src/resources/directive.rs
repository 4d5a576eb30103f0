use super::QuestResource;
use crate::parser::{DirectiveNode, parse_directive};
use crate::text::{Range, TextLine};

/// A preamble `Name: value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    node: DirectiveNode,
}

impl Directive {
    pub fn parse(line: &TextLine<'_>) -> Option<Self> {
        parse_directive(line).map(|node| Self { node })
    }

    pub fn name(&self) -> &str {
        &self.node.name.value
    }

    pub fn content(&self) -> &str {
        &self.node.content.value
    }

    pub fn content_range(&self) -> Range {
        self.node.content.range()
    }

    pub fn node(&self) -> &DirectiveNode {
        &self.node
    }
}

impl QuestResource for Directive {
    fn range(&self) -> Range {
        self.node.name.range()
    }

    fn block_range(&self) -> Range {
        self.node.range
    }
}
