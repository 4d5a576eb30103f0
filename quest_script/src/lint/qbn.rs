use quest_data::SymbolType;

use super::references::SYMBOL_NAME_INDEX;
use super::signature::check_parameters;
use super::{Diagnostic, DiagnosticCode, LintContext, SectionReport, undefined_expressions};
use crate::document::BlockKind;
use crate::parser::TaskKind;
use crate::parser::symbols::{is_conventional_name, symbol_key};
use crate::resources::{Action, OneOrMany, Parameterized, QuestResource};
use crate::signature::{ParameterType, SignatureMatch};
use crate::text::Range;

const START_TASK: [&str; 2] = ["start", "task"];
const SET_VAR: [&str; 1] = ["setvar"];

pub(super) fn lint<'a>(context: &LintContext<'a>) -> SectionReport<'a> {
    let mut report = SectionReport::default();
    undefined_expressions(BlockKind::Qbn, context.quest.qbn.info.failed_parse(), &mut report);
    lint_symbols(context, &mut report);
    lint_tasks(context, &mut report);
    lint_persist_until(context, &mut report);
    for action in context.quest.qbn.entry_point() {
        lint_action(context, action, &mut report);
    }
    report
}

/// One error per definition of a duplicated name, each listing every definition.
fn duplicates<T: QuestResource>(name: &str, defs: &OneOrMany<T>, report: &mut SectionReport<'_>) {
    if !defs.is_duplicated() {
        return;
    }
    let ranges: Vec<Range> = defs.iter().map(QuestResource::range).collect();
    for def in defs {
        report.push(
            Diagnostic::new(
                DiagnosticCode::DuplicatedDefinition,
                def.range(),
                format!("`{name}` is defined {} times", ranges.len()),
            )
            .with_related(ranges.clone()),
        );
    }
}

fn naming_convention(context: &LintContext<'_>, name: &str, range: Range, report: &mut SectionReport<'_>) {
    if context.config.naming_convention && !is_conventional_name(name) {
        report.push(Diagnostic::new(
            DiagnosticCode::SymbolNamingConvention,
            range,
            format!("`{name}` should be written as `_name_`"),
        ));
    }
}

fn lint_symbols<'a>(context: &LintContext<'a>, report: &mut SectionReport<'a>) {
    let qbn = &context.quest.qbn;
    for (name, defs) in qbn.symbols().iter() {
        duplicates(name, defs, report);

        for symbol in defs {
            match symbol.signature() {
                SignatureMatch::Invalid => report.push(Diagnostic::new(
                    DiagnosticCode::InvalidDefinition,
                    symbol.block_range(),
                    format!("no {} definition matches `{name}`", symbol.kind()),
                )),
                SignatureMatch::Valid(_) => {
                    check_parameters(
                        context,
                        &symbol.parameters_with_ranges(),
                        Some(SYMBOL_NAME_INDEX),
                        report,
                    );
                },
                SignatureMatch::NotRecognized => {},
            }
        }

        let symbol = defs.first();
        naming_convention(context, name, symbol.range(), report);

        if symbol.kind() == SymbolType::Clock {
            if !context.references.is_clock_started(&symbol_key(name)) {
                report.push(Diagnostic::new(
                    DiagnosticCode::UnstartedClock,
                    symbol.range(),
                    format!("clock `{name}` is never started with `start timer`"),
                ));
            }
            if qbn.task(name).is_none() {
                report.push(Diagnostic::new(
                    DiagnosticCode::UnlinkedClock,
                    symbol.range(),
                    format!("clock `{name}` has no task to run when it elapses"),
                ));
            }
        } else if !context.references.is_symbol_used(name) {
            report.push(Diagnostic::new(
                DiagnosticCode::UnusedDeclarationSymbol,
                symbol.range(),
                format!("{} `{name}` is never used", symbol.kind()),
            ));
        }
    }
}

fn lint_tasks<'a>(context: &LintContext<'a>, report: &mut SectionReport<'a>) {
    for (name, defs) in context.quest.qbn.tasks().iter() {
        duplicates(name, defs, report);

        let first = defs.first();
        naming_convention(context, name, first.range(), report);

        for task in defs {
            if task.kind() == TaskKind::Standard && task.actions().is_empty() {
                report.push(Diagnostic::new(
                    DiagnosticCode::ConvertTaskToVariable,
                    task.range(),
                    format!("`{name}` has no actions and can be declared as `variable {name}`"),
                ));
            }
        }

        // Usage is per name: reported once, at the first definition.
        let exempt = defs.iter().any(|task| {
            task.kind() == TaskKind::GlobalVarLink || task.has_any_condition(context.services.actions)
        });
        if !exempt && !context.references.is_task_used(name) {
            report.push(Diagnostic::new(
                DiagnosticCode::UnusedDeclarationTask,
                first.range(),
                format!("task `{name}` is never used"),
            ));
        }

        for task in defs {
            for action in task.actions() {
                lint_action(context, action, report);
            }
        }
    }
}

fn lint_persist_until<'a>(context: &LintContext<'a>, report: &mut SectionReport<'a>) {
    let qbn = &context.quest.qbn;
    for (name, defs) in qbn.persist_until().iter() {
        let target_is_task = qbn.task(name).is_some_and(|task| task.kind() == TaskKind::Standard);
        for block in defs {
            if !target_is_task {
                report.push(Diagnostic::new(
                    DiagnosticCode::UndefinedUntilPerformed,
                    block.range(),
                    format!("`{name}` is not a task"),
                ));
            }
            for action in block.actions() {
                lint_action(context, action, report);
            }
        }
    }
}

fn lint_action<'a>(context: &LintContext<'a>, action: &Action, report: &mut SectionReport<'a>) {
    if action.is_obsolete() {
        let message = match &action.info().source_name {
            Some(source) => format!("`{}` ({source}) is obsolete", action.template().source()),
            None => format!("`{}` is obsolete", action.template().source()),
        };
        report.push(Diagnostic::new(DiagnosticCode::ObsoleteAction, action.range(), message));
    }

    if context.config.activation_hints {
        activation_hints(context, action, report);
    }

    check_parameters(context, &action.parameters_with_ranges(), None, report);
}

/// `start task` targets real tasks and `setvar` targets variables.
fn activation_hints(context: &LintContext<'_>, action: &Action, report: &mut SectionReport<'_>) {
    let prefix = action.template().literal_prefix();
    let starts_task = prefix == START_TASK;
    let sets_var = prefix == SET_VAR;
    if !starts_task && !sets_var {
        return;
    }
    for (_, parameter, range) in action.parameters_with_ranges() {
        if parameter.kind != ParameterType::Task {
            continue;
        }
        let name = symbol_key(&parameter.value);
        let Some(task) = context.quest.qbn.task(&name) else {
            continue;
        };
        if starts_task && task.is_variable() {
            report.push(Diagnostic::new(
                DiagnosticCode::UseSetVarForVariable,
                range,
                format!("`{name}` is a variable; use `setvar {name}`"),
            ));
        } else if sets_var && !task.is_variable() {
            report.push(Diagnostic::new(
                DiagnosticCode::UseStartTaskForTask,
                range,
                format!("`{name}` is a task; use `start task {name}`"),
            ));
        }
    }
}
