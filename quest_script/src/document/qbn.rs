use log::trace;

use super::{BlockInfo, CurrentTask, ParserState};
use crate::lookup::QuestServices;
use crate::parser::TaskKind;
use crate::resources::{Action, Definitions, Symbol, Task};
use crate::text::TextLine;

/// The resource section: symbols, tasks and their actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qbn {
    pub info: BlockInfo,
    symbols: Definitions<Symbol>,
    tasks: Definitions<Task>,
    /// `until _x_ performed:` blocks keyed by the task they wait on.
    persist_until: Definitions<Task>,
    /// Actions that appear before the first task header.
    entry_point: Vec<Action>,
}

impl Qbn {
    pub(crate) fn parse(&mut self, line: &TextLine<'_>, state: &mut ParserState, services: &QuestServices<'_>) {
        if let Some(symbol) = Symbol::parse(line, services.symbols) {
            trace!("line {}: {} {}", line.number, symbol.kind(), symbol.name());
            self.symbols.insert(symbol.name().to_string(), symbol);
            return;
        }

        if let Some(task) = Task::parse(line, services.global_vars) {
            trace!("line {}: {:?} task {}", line.number, task.kind(), task.name());
            let name = task.name().to_string();
            state.current_task = Some(if task.kind() == TaskKind::PersistUntil {
                let index = self.persist_until.insert(name.clone(), task);
                CurrentTask::PersistUntil { name, index }
            } else {
                let index = self.tasks.insert(name.clone(), task);
                CurrentTask::Task { name, index }
            });
            return;
        }

        if let Some(action) = Action::parse(line, services.actions) {
            trace!("line {}: action `{}`", line.number, action.template().source());
            let owner = match &state.current_task {
                Some(CurrentTask::Task { name, index }) => self.tasks.get_mut(name, *index),
                Some(CurrentTask::PersistUntil { name, index }) => self.persist_until.get_mut(name, *index),
                None => None,
            };
            match owner {
                Some(task) => task.add_action(action),
                None => self.entry_point.push(action),
            }
            return;
        }

        self.info.push_failed(line);
    }

    pub fn symbols(&self) -> &Definitions<Symbol> {
        &self.symbols
    }

    pub fn tasks(&self) -> &Definitions<Task> {
        &self.tasks
    }

    pub fn persist_until(&self) -> &Definitions<Task> {
        &self.persist_until
    }

    pub fn entry_point(&self) -> &[Action] {
        &self.entry_point
    }

    /// First symbol declared as `name`.
    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// First task declared as `name` (persist-until blocks excluded).
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// Every action in the section: entry point first, then tasks, then persist-until blocks.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.entry_point
            .iter()
            .chain(self.tasks.all().flat_map(Task::actions))
            .chain(self.persist_until.all().flat_map(Task::actions))
    }
}
