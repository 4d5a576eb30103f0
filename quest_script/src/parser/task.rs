use crate::lookup::GlobalVariables;
use crate::text::{QuestToken, TextLine};

/// The four task header shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// `_name_ task:`
    Standard,
    /// `variable _name_`
    Variable,
    /// `until _name_ performed:`
    PersistUntil,
    /// `GlobalVarName _name_`
    GlobalVarLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNode {
    pub kind: TaskKind,
    pub symbol: QuestToken,
    pub global_var_name: Option<QuestToken>,
}

/// Parse a task header by line shape; global-variable tasks need the variable table.
pub fn parse_task(line: &TextLine<'_>, global_vars: &dyn GlobalVariables) -> Option<TaskNode> {
    let words = line.words();
    let (kind, symbol, global_var_name) = match words.as_slice() {
        [keyword, name] if keyword.value == "variable" => (TaskKind::Variable, name.clone(), None),
        [name, keyword] if keyword.value == "task:" => (TaskKind::Standard, name.clone(), None),
        [until, name, performed] if until.value == "until" && performed.value == "performed:" => {
            (TaskKind::PersistUntil, name.clone(), None)
        },
        [var, name] if global_vars.index_of(&var.value).is_some() => {
            (TaskKind::GlobalVarLink, name.clone(), Some(var.clone()))
        },
        _ => return None,
    };
    Some(TaskNode {
        kind,
        symbol,
        global_var_name,
    })
}
