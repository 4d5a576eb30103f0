//! quest_script: parser, resource model and semantic linter for quest scripts.
//!
//! A quest script is a plain-text file in three sections: a preamble of
//! `Name: value` directives, a `QRC:` catalog of numbered messages and a
//! `QBN:` section of typed symbols and tasks built from catalogued actions.
//!
//! ```
//! use quest_script::{Catalog, Quest, lint};
//! use quest_data::LookupTables;
//!
//! let catalog = Catalog::new(&LookupTables::default()).unwrap();
//! let quest = Quest::parse("Quest: S0000011\nQRC:\nQBN:\n", Some("S0000011"), &catalog.services());
//! assert!(lint(&quest, catalog.services()).is_empty());
//! ```
//!
//! Lookup data (symbol shapes, action overloads, value tables and so on) is
//! consumed through the traits in [`lookup`]; [`Catalog`] implements them over
//! [`quest_data::LookupTables`].

pub mod catalog;
pub mod config;
pub mod document;
pub mod lint;
pub mod lookup;
pub mod parser;
pub mod resources;
pub mod signature;
pub mod text;

pub use catalog::Catalog;
pub use config::{ConfigError, LintConfig, load_tables};
pub use document::{BlockKind, CommentBlock, Qbn, Qrc, Quest, ResourceRef};
pub use lint::{Diagnostic, DiagnosticCode, LintError, Linter, Severity, lint};
pub use lookup::{QuestInfo, QuestRegistry, QuestServices, StaticQuestRegistry};
pub use signature::{
    Parameter, ParameterType, SignatureMatch, SignatureTemplate, TemplateError, compile_to_pattern,
    expand_against_line,
};
pub use text::{Position, QuestToken, Range};
