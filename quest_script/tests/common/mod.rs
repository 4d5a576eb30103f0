#![allow(dead_code)]

use quest_data::LookupTables;
use quest_script::{Catalog, Diagnostic, DiagnosticCode, Linter, LintConfig, Quest, load_tables};

pub const TABLES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tables.toml");

/// A complete quest that lints clean against the fixture tables.
pub const NECKLACE: &str = "\
-- The lost necklace
Quest: S0000011
DisplayName: The Lost Necklace

QRC:
QuestorOffer: [1000]
%pcn, my necklace is lost near _inn_.

QuestComplete: [1004]
Thank you. Take _gold_.

Message: 1010
Meet =npc_ at __inn_.

QBN:
Item _gold_ gold
Person _npc_ face 4 faction The Merchants
Place _inn_ remote tavern
Clock _deadline_ 06:00

start timer _deadline_
place npc _npc_ at _inn_
say 1010

_found_ task:
  clicked item _gold_
  give pc _gold_ notify 1004

_deadline_ task:
  end quest
";

pub fn tables() -> LookupTables {
    load_tables(TABLES).expect("fixture tables load")
}

pub fn catalog() -> Catalog {
    Catalog::new(&tables()).expect("fixture templates compile")
}

pub fn parse(catalog: &Catalog, text: &str, identity: Option<&str>) -> Quest {
    Quest::parse(text, identity, &catalog.services())
}

pub fn lint_text(text: &str) -> Vec<Diagnostic> {
    let catalog = catalog();
    let quest = parse(&catalog, text, None);
    Linter::new(catalog.services(), LintConfig::default()).lint(&quest)
}

pub fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
    let mut codes: Vec<DiagnosticCode> = diagnostics.iter().map(|d| d.code).collect();
    codes.sort_by_key(|code| code.to_string());
    codes
}

pub fn count(diagnostics: &[Diagnostic], code: DiagnosticCode) -> usize {
    diagnostics.iter().filter(|d| d.code == code).count()
}
