use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every lookup table the quest front-end consults, in already-decoded form.
///
/// Callers build this from whatever native format they keep their game data
/// in; `quest_script` only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LookupTables {
    #[serde(default)]
    pub symbols: Vec<SymbolDefinitionDef>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    /// Enumerated parameter domains keyed by placeholder name (`disease`, `faction`, ...).
    #[serde(default)]
    pub values: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub global_vars: Vec<GlobalVarDef>,
    #[serde(default)]
    pub static_messages: Vec<StaticMessageDef>,
    #[serde(default)]
    pub macros: Vec<MacroDef>,
    #[serde(default)]
    pub quests: Vec<QuestDef>,
}

/// The closed set of symbol types a quest can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbolType {
    Item,
    Person,
    Place,
    Clock,
    Foe,
}

impl SymbolType {
    pub const ALL: [SymbolType; 5] = [
        SymbolType::Item,
        SymbolType::Person,
        SymbolType::Place,
        SymbolType::Clock,
        SymbolType::Foe,
    ];

    /// Keyword that opens a definition line of this type.
    pub fn keyword(self) -> &'static str {
        match self {
            SymbolType::Item => "Item",
            SymbolType::Person => "Person",
            SymbolType::Place => "Place",
            SymbolType::Clock => "Clock",
            SymbolType::Foe => "Foe",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == word)
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One accepted shape for a symbol definition line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolDefinitionDef {
    pub kind: SymbolType,
    /// Signature template, e.g. `Clock ${1:_clock_} ${2:time}`.
    pub signature: String,
    #[serde(default)]
    pub summary: String,
}

/// Whether a catalog entry performs work or tests state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    #[default]
    Action,
    Condition,
}

/// A catalog entry for an action or condition with all its overloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionDef {
    #[serde(default)]
    pub category: ActionCategory,
    /// Signature templates; lookup tries them in order.
    pub overloads: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub obsolete: bool,
    #[serde(default)]
    pub source_name: Option<String>,
}

/// A global variable that a task can be bound to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlobalVarDef {
    pub name: String,
    pub index: u32,
}

/// A message id reserved by the engine under a well-known alias.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaticMessageDef {
    pub alias: String,
    pub id: u32,
}

/// A `%name` context macro expanded by the engine inside message text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroDef {
    /// Macro name without the leading `%`.
    pub name: String,
    #[serde(default)]
    pub summary: String,
}

/// A quest known to exist outside the document being analysed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestDef {
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}
