use lazy_static::lazy_static;
use regex::Regex;

use super::{DeferredCheck, Diagnostic, DiagnosticCode, LintContext, SectionReport};
use crate::lookup::QuestRegistry;
use crate::parser::symbols::symbol_key;
use crate::signature::{Parameter, ParameterType};
use crate::text::Range;

lazy_static! {
    static ref TIME_OF_DAY: Regex = Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time pattern compiles");
}

/// Check every parameter of one action or symbol definition.
///
/// `skip` names an index left unchecked (a symbol's own name).
pub(super) fn check_parameters<'a>(
    context: &LintContext<'a>,
    parameters: &[(usize, &Parameter, Range)],
    skip: Option<usize>,
    report: &mut SectionReport<'a>,
) {
    let joined_tail = attribute_tail(context, parameters);
    for &(index, parameter, range) in parameters {
        if Some(index) == skip {
            continue;
        }
        if joined_tail.is_some_and(|start| index >= start) {
            continue;
        }
        if let Some(diagnostic) = check_parameter(context, parameter, range, report) {
            report.push(diagnostic);
        }
    }
}

/// Start of a trailing run of same-table attribute words that is valid as one phrase,
/// such as a faction name spread over a variadic placeholder.
fn attribute_tail(context: &LintContext<'_>, parameters: &[(usize, &Parameter, Range)]) -> Option<usize> {
    let (_, last, _) = parameters.last()?;
    let ParameterType::Attribute(table) = &last.kind else {
        return None;
    };
    let start = parameters
        .iter()
        .rposition(|(_, parameter, _)| parameter.kind != last.kind)
        .map_or(0, |pos| pos + 1);
    if parameters.len() - start < 2 {
        return None;
    }
    let phrase: Vec<&str> = parameters[start..].iter().map(|(_, p, _)| p.value.as_str()).collect();
    let phrase = phrase.join(" ");
    let values = context.services.values.values(table)?;
    values
        .iter()
        .any(|value| value.eq_ignore_ascii_case(&phrase))
        .then_some(parameters[start].0)
}

fn check_parameter<'a>(
    context: &LintContext<'a>,
    parameter: &Parameter,
    range: Range,
    report: &mut SectionReport<'a>,
) -> Option<Diagnostic> {
    let value = parameter.value.as_str();
    let quest = context.quest;
    match &parameter.kind {
        ParameterType::Keyword | ParameterType::FreeText => None,
        ParameterType::NaturalNumber => value.parse::<u64>().is_err().then(|| {
            Diagnostic::new(
                DiagnosticCode::NumberExpected,
                range,
                format!("`{value}` is not a non-negative number"),
            )
        }),
        ParameterType::Integer => value.parse::<i64>().is_err().then(|| {
            Diagnostic::new(DiagnosticCode::NumberExpected, range, format!("`{value}` is not a number"))
        }),
        ParameterType::Time => (!TIME_OF_DAY.is_match(value)).then(|| {
            Diagnostic::new(
                DiagnosticCode::TimeExpected,
                range,
                format!("`{value}` is not a 24-hour time (HH:MM)"),
            )
        }),
        ParameterType::Symbol(expected) => {
            let name = symbol_key(value);
            match (quest.qbn.symbol(&name), expected) {
                (None, None) if quest.qbn.task(&name).is_some() => None,
                (None, _) => Some(Diagnostic::new(
                    DiagnosticCode::UndefinedSymbol,
                    range,
                    format!("symbol `{value}` is not defined"),
                )),
                (Some(symbol), Some(expected)) if symbol.kind() != *expected => Some(Diagnostic::new(
                    DiagnosticCode::IncorrectSymbolType,
                    range,
                    format!("`{value}` is {} but {expected} is expected", symbol.kind()),
                )),
                (Some(_), _) => None,
            }
        },
        kind if kind.is_message() => {
            let resolved = match kind {
                ParameterType::MessageId => value.parse::<u32>().ok().and_then(|id| quest.qrc.message(id)),
                ParameterType::MessageName => quest.qrc.message_by_alias(value),
                _ => quest.qrc.resolve(value),
            };
            resolved.is_none().then(|| {
                Diagnostic::new(
                    DiagnosticCode::UndefinedMessage,
                    range,
                    format!("message `{value}` is not defined"),
                )
            })
        },
        ParameterType::Task => {
            quest.qbn.task(&symbol_key(value)).is_none().then(|| {
                Diagnostic::new(DiagnosticCode::UndefinedTask, range, format!("task `{value}` is not defined"))
            })
        },
        kind if kind.is_quest() => {
            if let Some(registry) = context.registry {
                report.deferred.push(resolve_quest(registry, value.to_string(), range));
            }
            None
        },
        ParameterType::Attribute(table) => {
            let values = context.services.values.values(table)?;
            (!values.iter().any(|allowed| allowed.eq_ignore_ascii_case(value))).then(|| {
                Diagnostic::new(
                    DiagnosticCode::UndefinedAttribute,
                    range,
                    format!("`{value}` is not a known {table}"),
                )
            })
        },
        _ => None,
    }
}

fn resolve_quest<'a>(registry: &'a dyn QuestRegistry, name: String, range: Range) -> DeferredCheck<'a> {
    Box::pin(async move {
        match registry.find(&name).await {
            Some(_) => None,
            None => Some(Diagnostic::new(
                DiagnosticCode::UndefinedQuest,
                range,
                format!("quest `{name}` is not defined"),
            )),
        }
    })
}
