use std::collections::HashMap;

use super::{Diagnostic, DiagnosticCode, LintContext, SectionReport, undefined_expressions};
use crate::document::BlockKind;
use crate::parser::symbols::{base_symbol, symbol_prefix};
use crate::resources::{Message, QuestResource, Symbol};
use crate::text::{QuestToken, Range};

pub(super) fn lint<'a>(context: &LintContext<'a>) -> SectionReport<'a> {
    let qrc = &context.quest.qrc;
    let mut report = SectionReport::default();

    undefined_expressions(BlockKind::Qrc, qrc.info.failed_parse(), &mut report);

    let mut by_id: HashMap<u32, Vec<Range>> = HashMap::new();
    for message in qrc.messages() {
        by_id.entry(message.id()).or_default().push(message.range());
    }

    let mut previous: Option<&Message> = None;
    for message in qrc.messages() {
        let ranges = &by_id[&message.id()];
        if ranges.len() > 1 {
            report.push(
                Diagnostic::new(
                    DiagnosticCode::DuplicatedMessageNumber,
                    message.range(),
                    format!("message number {} is used {} times", message.id(), ranges.len()),
                )
                .with_related(ranges.clone()),
            );
        }
        if let Some(previous) = previous
            && message.id() < previous.id()
        {
            report.push(Diagnostic::new(
                DiagnosticCode::IncorrectMessagePosition,
                message.range(),
                format!("message {} follows message {}", message.id(), previous.id()),
            ));
        }
        previous = Some(message);

        check_static_alias(context, message, &mut report);
        check_body(context, message, &mut report);
    }

    report
}

/// Alias consistency and unused checks, which both depend on the static table.
fn check_static_alias(context: &LintContext<'_>, message: &Message, report: &mut SectionReport<'_>) {
    let statics = context.services.static_messages;
    let registered_alias = statics.alias_of(message.id());

    match message.alias() {
        Some(alias) if statics.is_loaded() => match statics.id_of(alias) {
            Some(id) if id != message.id() => report.push(Diagnostic::new(
                DiagnosticCode::IncorrectStaticMessageId,
                message.id_range(),
                format!("`{alias}` is static message {id}, not {}", message.id()),
            )),
            Some(_) => {},
            None => report.push(Diagnostic::new(
                DiagnosticCode::UndefinedStaticMessage,
                message.range(),
                format!("`{alias}` is not a static message"),
            )),
        },
        Some(_) => {},
        None => {
            if let Some(alias) = &registered_alias {
                report.push(Diagnostic::new(
                    DiagnosticCode::ChangeStaticMessageToAlias,
                    message.range(),
                    format!("message {} is the static message `{alias}`", message.id()),
                ));
            }
        },
    }

    let is_static = message.alias().is_some() || registered_alias.is_some();
    if !is_static && !context.references.is_message_used(message) {
        let preview = message.preview(context.config.preview_length);
        let text = if preview.is_empty() {
            format!("message {} is never used", message.id())
        } else {
            format!("message {} is never used: {preview}", message.id())
        };
        report.push(Diagnostic::new(
            DiagnosticCode::UnusedDeclarationMessage,
            message.range(),
            text,
        ));
    }
}

fn check_body(context: &LintContext<'_>, message: &Message, report: &mut SectionReport<'_>) {
    let qbn = &context.quest.qbn;
    for token in &message.node().symbols {
        let Some(base) = base_symbol(&token.value) else {
            continue;
        };
        match qbn.symbol(&base) {
            Some(symbol) => check_variation(context, symbol, token, report),
            None if qbn.task(&base).is_some() => {},
            None => report.push(Diagnostic::new(
                DiagnosticCode::UndefinedSymbol,
                token.range(),
                format!("symbol `{base}` is not defined"),
            )),
        }
    }

    let macros = context.services.macros;
    if macros.is_loaded() {
        for token in &message.node().macros {
            if !macros.contains(&token.value) {
                report.push(Diagnostic::new(
                    DiagnosticCode::UndefinedContextMacro,
                    token.range(),
                    format!("`{}` is not a known context macro", token.value),
                ));
            }
        }
    }
}

fn check_variation(context: &LintContext<'_>, symbol: &Symbol, token: &QuestToken, report: &mut SectionReport<'_>) {
    let Some(prefix) = symbol_prefix(&token.value) else {
        return;
    };
    match symbol.variation(prefix) {
        None => report.push(Diagnostic::new(
            DiagnosticCode::IncorrectSymbolVariation,
            token.range(),
            format!("`{prefix}` is not a variation of {} `{}`", symbol.kind(), symbol.name()),
        )),
        Some(variation) if context.config.symbol_variation_hints => {
            if let Some(suggestion) = variation.suggestion.and_then(|s| symbol.variation(s)) {
                report.push(Diagnostic::new(
                    DiagnosticCode::SymbolVariation,
                    token.range(),
                    format!(
                        "`{}` shows the {}; `{}` shows the {}",
                        token.value,
                        variation.description,
                        token.value.replacen(prefix, suggestion.prefix, 1),
                        suggestion.description
                    ),
                ));
            }
        },
        Some(_) => {},
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::document::Quest;
    use crate::config::LintConfig;
    use crate::lint::{Diagnostic, DiagnosticCode, Linter, Severity, lint};
    use quest_data::{LookupTables, MacroDef, StaticMessageDef};

    fn catalog() -> Catalog {
        Catalog::new(&LookupTables {
            static_messages: vec![StaticMessageDef {
                alias: "QuestorOffer".into(),
                id: 1000,
            }],
            macros: vec![MacroDef {
                name: "pcn".into(),
                summary: String::new(),
            }],
            ..LookupTables::default()
        })
        .unwrap()
    }

    fn codes(text: &str) -> Vec<DiagnosticCode> {
        let catalog = catalog();
        let quest = Quest::parse(text, None, &catalog.services());
        lint(&quest, catalog.services()).into_iter().map(|d| d.code).collect()
    }

    fn find(text: &str, config: LintConfig, code: DiagnosticCode) -> Vec<Diagnostic> {
        let catalog = catalog();
        let quest = Quest::parse(text, None, &catalog.services());
        Linter::new(catalog.services(), config)
            .lint(&quest)
            .into_iter()
            .filter(|d| d.code == code)
            .collect()
    }

    #[test]
    fn duplicate_and_out_of_order_ids() {
        let found = codes("QRC:\nQuestorOffer: [1000]\nhi\nMessage: 1011\na\nMessage: 1010\nb\nMessage: 1011\nc");
        assert_eq!(
            found.iter().filter(|c| **c == DiagnosticCode::DuplicatedMessageNumber).count(),
            2
        );
        assert_eq!(
            found.iter().filter(|c| **c == DiagnosticCode::IncorrectMessagePosition).count(),
            1
        );
    }

    #[test]
    fn static_alias_consistency() {
        assert_eq!(codes("QRC:\nQuestorOffer: [1001]\nhi"), vec![DiagnosticCode::IncorrectStaticMessageId]);
        assert_eq!(codes("QRC:\nQuestorSpeech: [1001]\nhi"), vec![DiagnosticCode::UndefinedStaticMessage]);
        assert_eq!(codes("QRC:\nMessage: 1000\nhi"), vec![DiagnosticCode::ChangeStaticMessageToAlias]);
    }

    #[test]
    fn unused_messages_are_reported_once() {
        assert_eq!(codes("QRC:\nMessage: 1011\nhello"), vec![DiagnosticCode::UnusedDeclarationMessage]);
    }

    #[test]
    fn body_references_and_macros() {
        let found = codes("QRC:\nQuestorOffer: [1000]\n%pcn, %xyz, find _gem_.");
        assert_eq!(
            found,
            vec![DiagnosticCode::UndefinedSymbol, DiagnosticCode::UndefinedContextMacro]
        );
    }

    #[test]
    fn variation_outside_the_symbol_type() {
        let found = find(
            "QRC:\nQuestorOffer: [1000]\nFind __gem_.\nQBN:\nItem _gem_",
            LintConfig::default(),
            DiagnosticCode::IncorrectSymbolVariation,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Warning);
        assert!(found[0].message.contains("Item `_gem_`"));
    }

    #[test]
    fn variation_hints_suggest_the_alternative() {
        let text = "QRC:\nQuestorOffer: [1000]\nBe back by _deadline_.\nQBN:\nClock _deadline_";
        let found = find(text, LintConfig::default(), DiagnosticCode::SymbolVariation);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Hint);
        assert!(found[0].message.contains("`=deadline_`"));

        let quiet = LintConfig {
            symbol_variation_hints: false,
            ..LintConfig::default()
        };
        assert!(find(text, quiet, DiagnosticCode::SymbolVariation).is_empty());
    }
}
