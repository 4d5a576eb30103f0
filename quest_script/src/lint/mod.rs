//! Semantic checks over an assembled [`Quest`].
//!
//! The preamble, message catalog and resource section are checked by three
//! independent passes. Each pass returns its diagnostics together with any
//! checks that need the asynchronous quest registry; those are only awaited by
//! [`Linter::lint_with_registry`]. Results are concatenated in section order.

mod preamble;
mod qbn;
mod qrc;
mod references;
mod signature;

use std::fmt;
use std::thread;

use futures::future::{BoxFuture, join_all};
use log::debug;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use variantly::Variantly;

use crate::config::LintConfig;
use crate::document::{BlockKind, Quest};
use crate::lookup::{QuestRegistry, QuestServices};
use crate::text::{QuestToken, Range};

pub use references::References;

#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("lint cancelled before the registry checks completed")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Variantly)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "info",
            Severity::Hint => "hint",
        })
    }
}

/// What a diagnostic is about. Each code has a fixed severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    QuestNameMismatch,
    DuplicatedDirective,
    QuestNameInUse,
    DuplicatedMessageNumber,
    IncorrectMessagePosition,
    UnusedDeclarationMessage,
    IncorrectStaticMessageId,
    UndefinedStaticMessage,
    ChangeStaticMessageToAlias,
    UndefinedSymbol,
    IncorrectSymbolVariation,
    SymbolVariation,
    UndefinedContextMacro,
    InvalidDefinition,
    DuplicatedDefinition,
    UnusedDeclarationSymbol,
    UnusedDeclarationTask,
    UnstartedClock,
    UnlinkedClock,
    SymbolNamingConvention,
    ConvertTaskToVariable,
    UndefinedUntilPerformed,
    ObsoleteAction,
    UseSetVarForVariable,
    UseStartTaskForTask,
    UndefinedQuest,
    UndefinedExpression,
    NumberExpected,
    TimeExpected,
    IncorrectSymbolType,
    UndefinedMessage,
    UndefinedTask,
    UndefinedAttribute,
}

impl DiagnosticCode {
    pub fn severity(self) -> Severity {
        use DiagnosticCode::*;
        match self {
            QuestNameMismatch
            | DuplicatedMessageNumber
            | IncorrectStaticMessageId
            | UndefinedStaticMessage
            | UndefinedSymbol
            | UndefinedContextMacro
            | InvalidDefinition
            | DuplicatedDefinition
            | UndefinedUntilPerformed
            | UndefinedQuest
            | UndefinedExpression
            | NumberExpected
            | TimeExpected
            | IncorrectSymbolType
            | UndefinedMessage
            | UndefinedTask
            | UndefinedAttribute => Severity::Error,
            DuplicatedDirective
            | QuestNameInUse
            | UnusedDeclarationMessage
            | IncorrectSymbolVariation
            | UnusedDeclarationSymbol
            | UnusedDeclarationTask
            | UnstartedClock
            | UnlinkedClock => Severity::Warning,
            ObsoleteAction => Severity::Information,
            IncorrectMessagePosition
            | ChangeStaticMessageToAlias
            | SymbolVariation
            | SymbolNamingConvention
            | ConvertTaskToVariable
            | UseSetVarForVariable
            | UseStartTaskForTask => Severity::Hint,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// Other locations involved, e.g. every definition of a duplicated name.
    pub related: Vec<Range>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: code.severity(),
            code,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn with_related(mut self, related: Vec<Range>) -> Self {
        self.related = related;
        self
    }
}

/// A check waiting on the quest registry.
pub type DeferredCheck<'a> = BoxFuture<'a, Option<Diagnostic>>;

/// Output of one section pass.
#[derive(Default)]
pub struct SectionReport<'a> {
    pub diagnostics: Vec<Diagnostic>,
    pub deferred: Vec<DeferredCheck<'a>>,
}

impl SectionReport<'_> {
    fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

impl fmt::Debug for SectionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionReport")
            .field("diagnostics", &self.diagnostics)
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

/// Everything a pass reads.
struct LintContext<'a> {
    quest: &'a Quest,
    services: QuestServices<'a>,
    config: &'a LintConfig,
    references: References,
    registry: Option<&'a dyn QuestRegistry>,
}

/// Runs every pass over a quest with one set of services and switches.
#[derive(Debug, Clone)]
pub struct Linter<'a> {
    services: QuestServices<'a>,
    config: LintConfig,
}

impl<'a> Linter<'a> {
    pub fn new(services: QuestServices<'a>, config: LintConfig) -> Self {
        Self { services, config }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Run the synchronous checks; registry-backed checks are skipped.
    pub fn lint(&self, quest: &Quest) -> Vec<Diagnostic> {
        self.run_passes(quest, None)
            .into_iter()
            .flat_map(|report| report.diagnostics)
            .collect()
    }

    /// Run every check, awaiting registry lookups until they finish or `cancellation` fires.
    ///
    /// # Errors
    /// Returns [`LintError::Cancelled`] if `cancellation` fires first.
    pub async fn lint_with_registry(
        &self,
        quest: &Quest,
        registry: &dyn QuestRegistry,
        cancellation: &CancellationToken,
    ) -> Result<Vec<Diagnostic>, LintError> {
        let reports = self.run_passes(quest, Some(registry));
        let mut diagnostics = Vec::new();
        for report in reports {
            diagnostics.extend(report.diagnostics);
            if report.deferred.is_empty() {
                continue;
            }
            let resolved = tokio::select! {
                biased;
                () = cancellation.cancelled() => return Err(LintError::Cancelled),
                resolved = join_all(report.deferred) => resolved,
            };
            diagnostics.extend(resolved.into_iter().flatten());
        }
        if cancellation.is_cancelled() {
            return Err(LintError::Cancelled);
        }
        Ok(diagnostics)
    }

    fn run_passes<'q>(&'q self, quest: &'q Quest, registry: Option<&'q dyn QuestRegistry>) -> [SectionReport<'q>; 3] {
        let context = LintContext {
            quest,
            services: self.services,
            config: &self.config,
            references: References::collect(quest),
            registry,
        };
        let context = &context;
        let reports = thread::scope(|scope| {
            let preamble = scope.spawn(move || preamble::lint(context));
            let qrc = scope.spawn(move || qrc::lint(context));
            let qbn = qbn::lint(context);
            [join(preamble), join(qrc), qbn]
        });
        debug!(
            "linted quest {:?}: {} diagnostics, {} deferred",
            quest.name,
            reports.iter().map(|r| r.diagnostics.len()).sum::<usize>(),
            reports.iter().map(|r| r.deferred.len()).sum::<usize>()
        );
        reports
    }
}

/// One error per line a section could not parse.
fn undefined_expressions(block: BlockKind, failed: &[QuestToken], report: &mut SectionReport<'_>) {
    for token in failed {
        report.push(Diagnostic::new(
            DiagnosticCode::UndefinedExpression,
            token.range(),
            format!("`{}` is not a valid {block} expression", token.value),
        ));
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// Lint `quest` with default switches.
pub fn lint(quest: &Quest, services: QuestServices<'_>) -> Vec<Diagnostic> {
    Linter::new(services, LintConfig::default()).lint(quest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_carry_their_severity() {
        assert!(DiagnosticCode::UndefinedExpression.severity().is_error());
        assert!(DiagnosticCode::UnstartedClock.severity().is_warning());
        assert!(DiagnosticCode::ObsoleteAction.severity().is_information());
        assert!(DiagnosticCode::IncorrectMessagePosition.severity().is_hint());
        assert_eq!(DiagnosticCode::UnlinkedClock.to_string(), "UnlinkedClock");
    }

    #[test]
    fn diagnostics_serialize_with_their_code() {
        let diagnostic = Diagnostic::new(DiagnosticCode::UndefinedTask, Range::on_line(2, 4, 7), "no task `_a_`");
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["code"], "UndefinedTask");
        assert_eq!(json["severity"], "Error");
        assert_eq!(json["range"]["start"]["line"], 2);
    }

    #[test]
    fn empty_document_is_clean() {
        let quest = Quest::parse("", None, &QuestServices::unavailable());
        assert!(lint(&quest, QuestServices::unavailable()).is_empty());
    }
}
