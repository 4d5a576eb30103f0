use super::{Action, QuestResource};
use crate::lookup::{ActionCatalog, GlobalVariables};
use crate::parser::{TaskKind, TaskNode, parse_task};
use crate::text::{QuestToken, Range, TextLine};

/// A task header and the actions appended beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    node: TaskNode,
    block_range: Range,
    actions: Vec<Action>,
}

impl Task {
    pub fn parse(line: &TextLine<'_>, global_vars: &dyn GlobalVariables) -> Option<Self> {
        parse_task(line, global_vars).map(|node| Self {
            node,
            block_range: line.trimmed_range(),
            actions: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.node.symbol.value
    }

    pub fn kind(&self) -> TaskKind {
        self.node.kind
    }

    pub fn node(&self) -> &TaskNode {
        &self.node
    }

    pub fn global_var_name(&self) -> Option<&QuestToken> {
        self.node.global_var_name.as_ref()
    }

    /// Variables and global-variable links hold state instead of running actions.
    pub fn is_variable(&self) -> bool {
        matches!(self.node.kind, TaskKind::Variable | TaskKind::GlobalVarLink)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn add_action(&mut self, action: Action) {
        self.block_range = self.block_range.union(&action.block_range());
        self.actions.push(action);
    }

    /// True if the catalog classifies any of the task's actions as a condition.
    pub fn has_any_condition(&self, catalog: &dyn ActionCatalog) -> bool {
        self.actions.iter().any(|action| {
            catalog
                .find_action(action.text(), Some(action.first_word()))
                .is_some_and(|info| info.is_condition())
        })
    }
}

impl QuestResource for Task {
    fn range(&self) -> Range {
        self.node.symbol.range()
    }

    fn block_range(&self) -> Range {
        self.block_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::lookup::Unavailable;
    use crate::text::Position;
    use quest_data::{ActionCategory, ActionDef, GlobalVarDef, LookupTables};

    fn catalog() -> Catalog {
        Catalog::new(&LookupTables {
            actions: vec![
                ActionDef {
                    category: ActionCategory::Action,
                    overloads: vec!["end quest".into()],
                    summary: String::new(),
                    obsolete: false,
                    source_name: None,
                },
                ActionDef {
                    category: ActionCategory::Condition,
                    overloads: vec!["clicked item ${1:_item_}".into()],
                    summary: String::new(),
                    obsolete: false,
                    source_name: None,
                },
            ],
            global_vars: vec![GlobalVarDef {
                name: "Dragon_Sighted".into(),
                index: 12,
            }],
            ..LookupTables::default()
        })
        .unwrap()
    }

    #[test]
    fn actions_grow_the_block() {
        let catalog = catalog();
        let mut task = Task::parse(&TextLine::new(3, "_done_ task:"), &catalog).expect("task");
        assert_eq!(task.range(), Range::on_line(3, 0, 6));
        assert!(!task.has_any_condition(&catalog));

        task.add_action(Action::parse(&TextLine::new(4, "  end quest"), &catalog).unwrap());
        assert_eq!(task.block_range().end, Position::new(4, 11));
        assert!(!task.has_any_condition(&catalog));

        task.add_action(Action::parse(&TextLine::new(5, "  clicked item _gem_"), &catalog).unwrap());
        assert!(task.has_any_condition(&catalog));
        assert!(!task.has_any_condition(&Unavailable));
        assert!(task.block_range().contains_range(&task.range()));
    }

    #[test]
    fn variable_kinds() {
        let catalog = catalog();
        assert!(Task::parse(&TextLine::new(0, "variable _v_"), &catalog).unwrap().is_variable());
        assert!(Task::parse(&TextLine::new(0, "Dragon_Sighted _d_"), &catalog).unwrap().is_variable());
        assert!(!Task::parse(&TextLine::new(0, "until _a_ performed:"), &catalog).unwrap().is_variable());
    }
}
