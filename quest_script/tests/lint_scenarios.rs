mod common;

use common::{NECKLACE, catalog, codes, count, lint_text, parse};
use quest_script::resources::QuestResource;
use quest_script::{DiagnosticCode, Position, Range, Severity};

#[test]
fn complete_quest_is_clean() {
    let diagnostics = lint_text(NECKLACE);
    assert!(diagnostics.is_empty(), "{diagnostics:#?}");
}

#[test]
fn unreferenced_declarations_are_reported() {
    let text = "Quest: A\nQRC:\nMessage: 10\nhello\nQBN:\nItem _note_\nPerson _npc_";
    let diagnostics = lint_text(text);
    assert_eq!(
        codes(&diagnostics),
        vec![
            DiagnosticCode::UnusedDeclarationMessage,
            DiagnosticCode::UnusedDeclarationSymbol,
            DiagnosticCode::UnusedDeclarationSymbol,
        ]
    );

    let referenced = format!("{text}\nsay 10");
    assert_eq!(
        codes(&lint_text(&referenced)),
        vec![DiagnosticCode::UnusedDeclarationSymbol, DiagnosticCode::UnusedDeclarationSymbol]
    );
}

#[test]
fn unused_message_is_reported_once_at_its_declaration() {
    let text = "QRC:\nMessage: 1011\nNobody ever shows this.\n\nMessage: 1012\nOr this.\nQBN:\nsay 1012";
    let catalog = catalog();
    let quest = parse(&catalog, text, None);
    let diagnostics = lint_text(text);
    let unused: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::UnusedDeclarationMessage)
        .collect();
    assert_eq!(unused.len(), 1);
    let message = quest.qrc.message(1011).expect("message 1011");
    assert_eq!(unused[0].range, message.range());
    assert!(unused[0].message.contains("Nobody ever shows this."));
}

#[test]
fn unstarted_unlinked_clock() {
    let text = "QBN:\nClock _clock_ 00:30";
    let catalog = catalog();
    let quest = parse(&catalog, text, None);
    let diagnostics = lint_text(text);
    assert_eq!(
        codes(&diagnostics),
        vec![DiagnosticCode::UnlinkedClock, DiagnosticCode::UnstartedClock]
    );
    let declared = quest.qbn.symbol("_clock_").expect("clock").range();
    assert!(diagnostics.iter().all(|d| d.range == declared));
}

#[test]
fn duplicated_symbols_point_at_each_other() {
    let diagnostics = lint_text("QBN:\nItem _note_\nItem _note_\ngive pc _note_");
    let duplicates: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::DuplicatedDefinition)
        .collect();
    assert_eq!(duplicates.len(), 2);
    let first = Range::on_line(1, 5, 11);
    let second = Range::on_line(2, 5, 11);
    assert_eq!(duplicates[0].range, first);
    assert_eq!(duplicates[1].range, second);
    for duplicate in duplicates {
        assert_eq!(duplicate.related, vec![first, second]);
    }
}

#[test]
fn duplicated_tasks_point_at_each_other() {
    let diagnostics = lint_text("QBN:\n_a_ task:\n_a_ task:");
    assert_eq!(count(&diagnostics, DiagnosticCode::DuplicatedDefinition), 2);
    for duplicate in diagnostics.iter().filter(|d| d.code == DiagnosticCode::DuplicatedDefinition) {
        assert_eq!(duplicate.related.len(), 2);
        assert_ne!(duplicate.related[0], duplicate.related[1]);
        assert!(duplicate.related.contains(&duplicate.range));
    }
}

#[test]
fn unknown_action_is_one_error_over_the_trimmed_line() {
    let diagnostics = lint_text("QBN:\n_a_ task:\n  frobnicate the widget\n  end quest");
    let undefined: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::UndefinedExpression)
        .collect();
    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].severity, Severity::Error);
    assert_eq!(
        undefined[0].range,
        Range::new(Position::new(2, 2), Position::new(2, 23))
    );
}

#[test]
fn parameter_types_are_enforced() {
    let text = "\
QRC:
Message: 1010
Hello.
QBN:
Item _gold_
Person _npc_ face four faction The Merchants
Place _inn_ remote castle
give pc _npc_ notify 1010
place npc _npc_ at _inn_
daily from 25:00 to 18:00
make pc ill with Witches Pox
make pc ill with Purple Spots
start task _nowhere_
say 2000
add _gold_ face";
    let diagnostics = lint_text(text);
    assert_eq!(count(&diagnostics, DiagnosticCode::NumberExpected), 1);
    assert_eq!(count(&diagnostics, DiagnosticCode::UndefinedAttribute), 3);
    assert_eq!(count(&diagnostics, DiagnosticCode::IncorrectSymbolType), 1);
    assert_eq!(count(&diagnostics, DiagnosticCode::TimeExpected), 1);
    assert_eq!(count(&diagnostics, DiagnosticCode::UndefinedTask), 1);
    assert_eq!(count(&diagnostics, DiagnosticCode::UndefinedMessage), 1);
    assert_eq!(count(&diagnostics, DiagnosticCode::UndefinedSymbol), 0);
}

#[test]
fn global_variable_tasks_and_conditions_are_not_unused() {
    let text = "QBN:\nItem _gold_\nArrested _jailed_\n_picked_ task:\n  clicked item _gold_\nvariable _spare_";
    let found = codes(&lint_text(text));
    assert_eq!(found, vec![DiagnosticCode::UnusedDeclarationTask]);
}

#[test]
fn obsolete_actions_name_their_source() {
    let diagnostics = lint_text("QBN:\nPlace _inn_ remote tavern\nreveal _inn_");
    assert_eq!(codes(&diagnostics), vec![DiagnosticCode::ObsoleteAction]);
    assert!(diagnostics[0].message.contains("RevealLocation"));
    assert_eq!(diagnostics[0].severity, Severity::Information);
}
