use super::BlockInfo;
use crate::resources::Directive;
use crate::text::TextLine;

/// Directive name holding the quest's declared name.
pub const QUEST_DIRECTIVE: &str = "Quest";

/// The leading `Name: value` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preamble {
    pub info: BlockInfo,
    directives: Vec<Directive>,
}

impl Preamble {
    pub(crate) fn parse(&mut self, line: &TextLine<'_>) {
        match Directive::parse(line) {
            Some(directive) => self.directives.push(directive),
            None => self.info.push_failed(line),
        }
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// First directive called `name`.
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|directive| directive.name() == name)
    }

    /// The `Quest:` directive, if declared.
    pub fn quest_name(&self) -> Option<&Directive> {
        self.directive(QUEST_DIRECTIVE)
    }
}
