//! Line-level node parser for quest scripts.
//!
//! Each function classifies exactly one line and either returns a node or
//! `None` when the line belongs to some other construct. Nothing here looks at
//! neighbouring lines; multi-line constructs (message bodies, task action
//! lists) are stitched together by the document assembler.

mod directive;
mod message;
mod symbol;
pub mod symbols;
mod task;

pub use directive::{DirectiveNode, parse_directive};
pub use message::{MessageNode, parse_message, scan_message_line};
pub use symbol::{SymbolNode, parse_symbol};
pub use task::{TaskKind, TaskNode, parse_task};
