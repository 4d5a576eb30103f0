use std::collections::HashMap;

use super::{DeferredCheck, Diagnostic, DiagnosticCode, LintContext, SectionReport, undefined_expressions};
use crate::document::BlockKind;
use crate::lookup::QuestRegistry;
use crate::resources::QuestResource;
use crate::text::Range;

pub(super) fn lint<'a>(context: &LintContext<'a>) -> SectionReport<'a> {
    let quest = context.quest;
    let preamble = &quest.preamble;
    let mut report = SectionReport::default();

    undefined_expressions(BlockKind::Preamble, preamble.info.failed_parse(), &mut report);

    let mut by_name: HashMap<&str, Vec<Range>> = HashMap::new();
    for directive in preamble.directives() {
        by_name.entry(directive.name()).or_default().push(directive.range());
    }
    for directive in preamble.directives() {
        let ranges = &by_name[directive.name()];
        if ranges.len() > 1 {
            report.push(
                Diagnostic::new(
                    DiagnosticCode::DuplicatedDirective,
                    directive.range(),
                    format!("`{}` is declared {} times", directive.name(), ranges.len()),
                )
                .with_related(ranges.clone()),
            );
        }
    }

    let Some(declared) = preamble.quest_name() else {
        return report;
    };
    if let Some(identity) = quest.name.as_deref() {
        if !declared.content().eq_ignore_ascii_case(identity) {
            report.push(Diagnostic::new(
                DiagnosticCode::QuestNameMismatch,
                declared.content_range(),
                format!("quest name `{}` does not match `{identity}`", declared.content()),
            ));
        }
        if let Some(registry) = context.registry {
            report.deferred.push(confirm_identity(
                registry,
                declared.content().to_string(),
                identity.to_string(),
                declared.content_range(),
            ));
        }
    }
    report
}

/// Warn when the registry attributes the declared name to another document.
fn confirm_identity<'a>(
    registry: &'a dyn QuestRegistry,
    name: String,
    identity: String,
    range: Range,
) -> DeferredCheck<'a> {
    Box::pin(async move {
        let found = registry.find(&name).await?;
        let source = found.source?;
        (!source.eq_ignore_ascii_case(&identity)).then(|| {
            Diagnostic::new(
                DiagnosticCode::QuestNameInUse,
                range,
                format!("quest name `{name}` is already used by `{source}`"),
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use crate::document::Quest;
    use crate::lint::{DiagnosticCode, lint};
    use crate::lookup::QuestServices;

    fn codes(text: &str, identity: Option<&str>) -> Vec<DiagnosticCode> {
        let services = QuestServices::unavailable();
        let quest = Quest::parse(text, identity, &services);
        lint(&quest, services).into_iter().map(|d| d.code).collect()
    }

    #[test]
    fn quest_name_must_match_identity() {
        assert_eq!(
            codes("Quest: S0000011", Some("S0000012")),
            vec![DiagnosticCode::QuestNameMismatch]
        );
        assert!(codes("Quest: s0000011", Some("S0000011")).is_empty());
        assert!(codes("Quest: S0000011", None).is_empty());
    }

    #[test]
    fn duplicate_directives_and_bad_lines() {
        let found = codes("Quest: A\nQuest: A\nnonsense here", Some("A"));
        assert_eq!(
            found,
            vec![
                DiagnosticCode::UndefinedExpression,
                DiagnosticCode::DuplicatedDirective,
                DiagnosticCode::DuplicatedDirective,
            ]
        );
    }
}
