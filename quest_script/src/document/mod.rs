//! Document assembly: one pass over a quest script's lines, dispatching each
//! line to the section it belongs to.
//!
//! A script is split by the `QRC:` and `QBN:` boundary lines into a preamble,
//! a message catalog and a resource section. Blank lines only matter as
//! message terminators and comment lines are collected separately, so every
//! other line is either recognized by its section or recorded as a failed
//! parse for the linter to report.

mod preamble;
mod qbn;
mod qrc;

pub use preamble::{Preamble, QUEST_DIRECTIVE};
pub use qbn::Qbn;
pub use qrc::Qrc;

use std::fmt;

use log::{debug, trace};

use crate::lookup::QuestServices;
use crate::resources::{Action, Directive, Message, QuestResource, Symbol, Task};
use crate::text::{Position, QuestToken, Range, TextLine};

const QRC_BOUNDARY: &str = "QRC:";
const QBN_BOUNDARY: &str = "QBN:";

/// The three sections, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockKind {
    Preamble,
    Qrc,
    Qbn,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlockKind::Preamble => "preamble",
            BlockKind::Qrc => "QRC",
            BlockKind::Qbn => "QBN",
        })
    }
}

/// Bookkeeping shared by every section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockInfo {
    range: Option<Range>,
    failed_parse: Vec<QuestToken>,
}

impl BlockInfo {
    /// Span of the section; `None` only while the section is still being read.
    pub fn range(&self) -> Option<Range> {
        self.range
    }

    /// # Panics
    /// Panics if the range was already set.
    pub fn set_range(&mut self, range: Range) {
        assert!(self.range.is_none(), "block range set twice");
        self.range = Some(range);
    }

    /// Trimmed lines no construct of the section recognized.
    pub fn failed_parse(&self) -> &[QuestToken] {
        &self.failed_parse
    }

    pub(crate) fn push_failed(&mut self, line: &TextLine<'_>) {
        trace!("line {}: unrecognized", line.number);
        self.failed_parse.push(line.trimmed_token());
    }
}

/// Consecutive comment lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    pub range: Range,
    /// Trimmed text of each comment line.
    pub lines: Vec<String>,
}

/// The task that following action lines are appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentTask {
    Task { name: String, index: usize },
    PersistUntil { name: String, index: usize },
}

/// Cursor state carried through the single assembly pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    /// Index of the message still accepting body lines.
    pub open_message: Option<usize>,
    pub current_task: Option<CurrentTask>,
    /// Blank lines seen since the last non-blank line.
    pub blank_run: usize,
}

/// A resource found by position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceRef<'a> {
    Directive(&'a Directive),
    Message(&'a Message),
    Symbol(&'a Symbol),
    Task(&'a Task),
    Action(&'a Action),
}

impl ResourceRef<'_> {
    pub fn range(&self) -> Range {
        match self {
            ResourceRef::Directive(directive) => directive.range(),
            ResourceRef::Message(message) => message.range(),
            ResourceRef::Symbol(symbol) => symbol.range(),
            ResourceRef::Task(task) => task.range(),
            ResourceRef::Action(action) => action.range(),
        }
    }

    pub fn block_range(&self) -> Range {
        match self {
            ResourceRef::Directive(directive) => directive.block_range(),
            ResourceRef::Message(message) => message.block_range(),
            ResourceRef::Symbol(symbol) => symbol.block_range(),
            ResourceRef::Task(task) => task.block_range(),
            ResourceRef::Action(action) => action.block_range(),
        }
    }
}

/// A fully assembled quest script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quest {
    /// Identity of the document (usually its file stem), when known.
    pub name: Option<String>,
    pub preamble: Preamble,
    pub qrc: Qrc,
    pub qbn: Qbn,
    pub comments: Vec<CommentBlock>,
}

impl Quest {
    pub fn parse(text: &str, identity: Option<&str>, services: &QuestServices<'_>) -> Self {
        Self::parse_lines(text.lines(), identity, services)
    }

    pub fn parse_lines<I, S>(lines: I, identity: Option<&str>, services: &QuestServices<'_>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut quest = Quest {
            name: identity.map(str::to_string),
            ..Quest::default()
        };
        let mut state = ParserState::default();
        let mut block = BlockKind::Preamble;
        let mut block_start = Position::default();
        let mut end = Position::default();

        for (number, text) in lines.into_iter().enumerate() {
            let line = TextLine::new(number, text.as_ref());
            end = Position::new(number, line.text.len());

            if line.is_blank() {
                state.blank_run += 1;
                if state.blank_run >= 2 {
                    state.open_message = None;
                }
                continue;
            }
            state.blank_run = 0;

            if line.is_comment() {
                quest.push_comment(&line);
                continue;
            }

            let boundary = Position::new(number, 0);
            match (line.trimmed(), block) {
                (QRC_BOUNDARY, BlockKind::Preamble) => {
                    quest.preamble.info.set_range(Range::new(block_start, boundary));
                    block = BlockKind::Qrc;
                    block_start = boundary;
                    continue;
                },
                (QBN_BOUNDARY, BlockKind::Preamble | BlockKind::Qrc) => {
                    if block == BlockKind::Preamble {
                        quest.preamble.info.set_range(Range::new(block_start, boundary));
                        quest.qrc.info.set_range(Range::new(boundary, boundary));
                    } else {
                        quest.qrc.info.set_range(Range::new(block_start, boundary));
                    }
                    state.open_message = None;
                    block = BlockKind::Qbn;
                    block_start = boundary;
                    continue;
                },
                _ => {},
            }

            match block {
                BlockKind::Preamble => quest.preamble.parse(&line),
                BlockKind::Qrc => quest.qrc.parse(&line, &mut state),
                BlockKind::Qbn => quest.qbn.parse(&line, &mut state, services),
            }
        }

        // The open section runs to the end; sections never reached are empty there.
        let closing = Range::new(block_start, end);
        let at_end = Range::new(end, end);
        match block {
            BlockKind::Preamble => {
                quest.preamble.info.set_range(closing);
                quest.qrc.info.set_range(at_end);
                quest.qbn.info.set_range(at_end);
            },
            BlockKind::Qrc => {
                quest.qrc.info.set_range(closing);
                quest.qbn.info.set_range(at_end);
            },
            BlockKind::Qbn => quest.qbn.info.set_range(closing),
        }

        debug!(
            "assembled quest {:?}: {} directives, {} messages, {} symbols, {} tasks, {} unparsed lines",
            quest.name,
            quest.preamble.directives().len(),
            quest.qrc.messages().len(),
            quest.qbn.symbols().len(),
            quest.qbn.tasks().len(),
            quest.failed_parse().count()
        );
        quest
    }

    fn push_comment(&mut self, line: &TextLine<'_>) {
        let range = line.trimmed_range();
        if let Some(block) = self.comments.last_mut()
            && block.range.end.line + 1 == line.number
        {
            block.range = block.range.union(&range);
            block.lines.push(line.trimmed().to_string());
            return;
        }
        self.comments.push(CommentBlock {
            range,
            lines: vec![line.trimmed().to_string()],
        });
    }

    /// Every unrecognized line, tagged with its section.
    pub fn failed_parse(&self) -> impl Iterator<Item = (BlockKind, &QuestToken)> {
        tagged(BlockKind::Preamble, &self.preamble.info)
            .chain(tagged(BlockKind::Qrc, &self.qrc.info))
            .chain(tagged(BlockKind::Qbn, &self.qbn.info))
    }

    /// The comment block ending on the line just above `range`.
    pub fn comment_for(&self, range: Range) -> Option<&CommentBlock> {
        self.comments
            .iter()
            .find(|block| block.range.end.line + 1 == range.start.line)
    }

    /// The innermost resource whose block covers `position`.
    pub fn resource_at(&self, position: Position) -> Option<ResourceRef<'_>> {
        let covers = |resource: &dyn QuestResource| resource.block_range().contains(position);

        if let Some(directive) = self.preamble.directives().iter().find(|d| covers(*d)) {
            return Some(ResourceRef::Directive(directive));
        }
        if let Some(message) = self.qrc.messages().iter().find(|m| covers(*m)) {
            return Some(ResourceRef::Message(message));
        }
        if let Some(symbol) = self.qbn.symbols().all().find(|s| covers(*s)) {
            return Some(ResourceRef::Symbol(symbol));
        }
        if let Some(action) = self.qbn.actions().find(|a| covers(*a)) {
            return Some(ResourceRef::Action(action));
        }
        self.qbn
            .tasks()
            .all()
            .chain(self.qbn.persist_until().all())
            .find(|t| covers(*t))
            .map(ResourceRef::Task)
    }
}

fn tagged(kind: BlockKind, info: &BlockInfo) -> impl Iterator<Item = (BlockKind, &QuestToken)> {
    info.failed_parse().iter().map(move |token| (kind, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Quest {
        Quest::parse(text, Some("S0000011"), &QuestServices::unavailable())
    }

    #[test]
    fn sections_partition_the_document() {
        let quest = parse("Quest: S0000011\n\nQRC:\n\nMessage: 10\nhello\n\nQBN:\nItem _note_\n");
        assert_eq!(quest.preamble.info.range(), Some(Range::new(Position::new(0, 0), Position::new(2, 0))));
        assert_eq!(
            quest.qrc.info.range(),
            Some(Range::new(Position::new(2, 0), Position::new(7, 0)))
        );
        assert_eq!(
            quest.qbn.info.range(),
            Some(Range::new(Position::new(7, 0), Position::new(8, 11)))
        );
        assert_eq!(quest.qrc.messages().len(), 1);
        assert_eq!(quest.qrc.message(10).map(|m| m.body().len()), Some(1));
        assert!(quest.qbn.symbol("_note_").is_some());
    }

    #[test]
    fn missing_qrc_is_empty_at_the_qbn_boundary() {
        let quest = parse("Quest: S0000011\nQBN:\nItem _note_");
        let boundary = Position::new(1, 0);
        assert_eq!(quest.qrc.info.range(), Some(Range::new(boundary, boundary)));
        assert_eq!(quest.preamble.info.range().map(|r| r.end), Some(boundary));
    }

    #[test]
    fn repeated_boundaries_are_failed_lines() {
        let quest = parse("Quest: A\nQRC:\nQBN:\nQRC:\nQBN:");
        let failed: Vec<(BlockKind, &str)> = quest.failed_parse().map(|(k, t)| (k, t.value.as_str())).collect();
        assert_eq!(failed, vec![(BlockKind::Qbn, "QRC:"), (BlockKind::Qbn, "QBN:")]);
    }

    #[test]
    fn two_blank_lines_close_a_message() {
        let quest = parse("QRC:\nMessage: 10\nfirst\n\nsecond\n\n\nstray text");
        let message = quest.qrc.message(10).expect("message");
        assert_eq!(message.body(), &["first".to_string(), "second".to_string()]);
        assert_eq!(quest.qrc.info.failed_parse()[0].value, "stray text");
    }

    #[test]
    fn text_before_any_message_is_a_failed_parse() {
        let quest = parse("QRC:\nhello\nMessage: 10\nworld");
        assert_eq!(quest.qrc.info.failed_parse().len(), 1);
        assert_eq!(quest.qrc.messages()[0].body().len(), 1);
    }

    #[test]
    fn comments_group_and_attach_to_resources() {
        let quest = parse("QRC:\n-- greeting\n-- shown first\nMessage: 10\nhi\n\n- lone\n\nMessage: 11\nbye");
        assert_eq!(quest.comments.len(), 2);
        assert_eq!(quest.comments[0].lines, vec!["-- greeting", "-- shown first"]);

        let greeting = quest.qrc.message(10).expect("message");
        let comment = quest.comment_for(greeting.block_range()).expect("comment");
        assert_eq!(comment.range.start.line, 1);
        let farewell = quest.qrc.message(11).expect("message");
        assert!(quest.comment_for(farewell.block_range()).is_none());
    }

    #[test]
    fn failed_parse_keeps_the_trimmed_line() {
        let quest = parse("  not a directive  ");
        let (kind, token) = quest.failed_parse().next().expect("failed line");
        assert_eq!(kind, BlockKind::Preamble);
        assert_eq!(token.range(), Range::on_line(0, 2, 17));
    }

    #[test]
    fn resource_at_finds_the_enclosing_resource() {
        let quest = parse("Quest: S0000011\nQRC:\nMessage: 10\nhello there\n");
        match quest.resource_at(Position::new(3, 4)) {
            Some(ResourceRef::Message(message)) => assert_eq!(message.id(), 10),
            other => panic!("expected message, got {other:?}"),
        }
        assert!(matches!(
            quest.resource_at(Position::new(0, 2)),
            Some(ResourceRef::Directive(_))
        ));
        assert!(quest.resource_at(Position::new(1, 1)).is_none());
    }

    #[test]
    #[should_panic(expected = "block range set twice")]
    fn block_range_is_set_once() {
        let mut info = BlockInfo::default();
        info.set_range(Range::default());
        info.set_range(Range::default());
    }
}
