use log::trace;

use super::{BlockInfo, ParserState};
use crate::resources::Message;
use crate::text::TextLine;

/// The message catalog section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qrc {
    pub info: BlockInfo,
    messages: Vec<Message>,
}

impl Qrc {
    pub(crate) fn parse(&mut self, line: &TextLine<'_>, state: &mut ParserState) {
        if let Some(message) = Message::parse(line) {
            trace!("line {}: message {}", line.number, message.id());
            state.open_message = Some(self.messages.len());
            self.messages.push(message);
            return;
        }
        match state.open_message.and_then(|index| self.messages.get_mut(index)) {
            Some(message) => message.append_body_line(line),
            None => self.info.push_failed(line),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// First message with numeric id `id`.
    pub fn message(&self, id: u32) -> Option<&Message> {
        self.messages.iter().find(|message| message.id() == id)
    }

    pub fn message_by_alias(&self, alias: &str) -> Option<&Message> {
        self.messages.iter().find(|message| message.alias() == Some(alias))
    }

    /// Resolve a message reference written either as an id or as an alias.
    pub fn resolve(&self, reference: &str) -> Option<&Message> {
        match reference.parse::<u32>() {
            Ok(id) => self.message(id),
            Err(_) => self.message_by_alias(reference),
        }
    }
}
