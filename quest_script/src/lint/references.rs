use std::collections::HashSet;

use crate::document::Quest;
use crate::parser::symbols::{base_symbol, symbol_key};
use crate::resources::{Message, Parameterized};
use crate::signature::{Parameter, ParameterType};

/// Index of a symbol definition's own name among its parameters.
pub(super) const SYMBOL_NAME_INDEX: usize = 1;

const START_TIMER: [&str; 2] = ["start", "timer"];

/// Every name the quest refers to, gathered once before the passes run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    symbols: HashSet<String>,
    tasks: HashSet<String>,
    messages: HashSet<String>,
    started_clocks: HashSet<String>,
}

impl References {
    pub fn collect(quest: &Quest) -> Self {
        let mut refs = References::default();

        for action in quest.qbn.actions() {
            let starts_timer = action.template().literal_prefix() == START_TIMER;
            for parameter in action.parameters() {
                refs.record(parameter);
                if starts_timer && matches!(parameter.kind, ParameterType::Symbol(_)) {
                    refs.started_clocks.insert(symbol_key(&parameter.value));
                }
            }
        }

        for symbol in quest.qbn.symbols().all() {
            for (index, parameter) in symbol.parameters().iter().enumerate() {
                if index != SYMBOL_NAME_INDEX {
                    refs.record(parameter);
                }
            }
            if symbol.kind() == quest_data::SymbolType::Clock {
                refs.tasks.insert(symbol.name().to_string());
            }
        }

        for message in quest.qrc.messages() {
            for token in &message.node().symbols {
                if let Some(base) = base_symbol(&token.value) {
                    refs.tasks.insert(base.clone());
                    refs.symbols.insert(base);
                }
            }
        }

        for (name, _) in quest.qbn.persist_until().iter() {
            refs.tasks.insert(name.to_string());
        }

        refs
    }

    fn record(&mut self, parameter: &Parameter) {
        match &parameter.kind {
            // An untyped symbol parameter may also name a task.
            ParameterType::Symbol(None) => {
                let name = symbol_key(&parameter.value);
                self.tasks.insert(name.clone());
                self.symbols.insert(name);
            },
            ParameterType::Symbol(Some(_)) => {
                self.symbols.insert(symbol_key(&parameter.value));
            },
            ParameterType::Task => {
                self.tasks.insert(symbol_key(&parameter.value));
            },
            kind if kind.is_message() => {
                self.messages.insert(parameter.value.clone());
            },
            _ => {},
        }
    }

    pub fn is_symbol_used(&self, name: &str) -> bool {
        self.symbols.contains(name)
    }

    pub fn is_task_used(&self, name: &str) -> bool {
        self.tasks.contains(name)
    }

    pub fn is_clock_started(&self, name: &str) -> bool {
        self.started_clocks.contains(name)
    }

    /// True if any message parameter names `message` by id or alias.
    pub fn is_message_used(&self, message: &Message) -> bool {
        self.messages.iter().any(|reference| message.is_referenced_by(reference))
    }
}
