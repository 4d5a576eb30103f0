//! Read-only lookup services supplied by the caller.
//!
//! Every lookup answers `None` (or `false` from `is_loaded`) when it has no
//! data; checks that depend on an unavailable lookup quietly do nothing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use quest_data::{ActionCategory, QuestDef, SymbolType};

use crate::signature::SignatureTemplate;

/// The definition shape a symbol line matched.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolDefinitionInfo {
    pub kind: SymbolType,
    pub template: Arc<SignatureTemplate>,
    pub summary: String,
}

/// The catalog overload an action line matched.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionInfo {
    pub template: Arc<SignatureTemplate>,
    pub category: ActionCategory,
    pub obsolete: bool,
    pub summary: String,
    pub source_name: Option<String>,
    /// Index of the matched overload within its catalog entry.
    pub overload: usize,
}

impl ActionInfo {
    pub fn is_condition(&self) -> bool {
        self.category == ActionCategory::Condition
    }
}

/// A quest known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestInfo {
    pub name: String,
    /// Identity of the document that declares the quest, when known.
    pub source: Option<String>,
    pub display_name: Option<String>,
}

impl From<&QuestDef> for QuestInfo {
    fn from(def: &QuestDef) -> Self {
        Self {
            name: def.name.clone(),
            source: def.source.clone(),
            display_name: def.display_name.clone(),
        }
    }
}

pub trait SymbolCatalog: Send + Sync {
    /// First definition of `kind` whose pattern accepts `line_text`.
    fn find_definition(&self, kind: SymbolType, line_text: &str) -> Option<SymbolDefinitionInfo>;

    /// Whether any definition of `kind` is known at all.
    fn has_definitions(&self, kind: SymbolType) -> bool;
}

pub trait ActionCatalog: Send + Sync {
    /// First overload whose pattern accepts `line_text`, among entries whose
    /// first word is `prefix` (the line's own first word when `None`).
    fn find_action(&self, line_text: &str, prefix: Option<&str>) -> Option<ActionInfo>;

    /// Every overload whose first word is `prefix`, in catalog order.
    fn find_actions(&self, prefix: &str) -> Vec<ActionInfo>;
}

pub trait ValueTables: Send + Sync {
    /// Allowed values for an enumerated parameter type, if the table exists.
    fn values(&self, parameter_type: &str) -> Option<Vec<String>>;
}

pub trait GlobalVariables: Send + Sync {
    fn index_of(&self, name: &str) -> Option<u32>;
}

pub trait StaticMessages: Send + Sync {
    fn id_of(&self, alias: &str) -> Option<u32>;

    fn alias_of(&self, id: u32) -> Option<String>;

    fn is_loaded(&self) -> bool {
        true
    }
}

pub trait MacroGlossary: Send + Sync {
    fn contains(&self, name: &str) -> bool;

    fn is_loaded(&self) -> bool {
        true
    }
}

/// Asynchronous, possibly I/O-bound registry of quests outside the current document.
#[async_trait]
pub trait QuestRegistry: Send + Sync {
    async fn find(&self, name: &str) -> Option<QuestInfo>;
}

/// The synchronous services parsing and linting read from.
#[derive(Clone, Copy)]
pub struct QuestServices<'a> {
    pub symbols: &'a dyn SymbolCatalog,
    pub actions: &'a dyn ActionCatalog,
    pub values: &'a dyn ValueTables,
    pub global_vars: &'a dyn GlobalVariables,
    pub static_messages: &'a dyn StaticMessages,
    pub macros: &'a dyn MacroGlossary,
}

impl QuestServices<'static> {
    /// Services with no data behind them; every check that needs a lookup is skipped.
    pub fn unavailable() -> Self {
        Self {
            symbols: &Unavailable,
            actions: &Unavailable,
            values: &Unavailable,
            global_vars: &Unavailable,
            static_messages: &Unavailable,
            macros: &Unavailable,
        }
    }
}

impl std::fmt::Debug for QuestServices<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestServices").finish_non_exhaustive()
    }
}

/// A lookup that knows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl SymbolCatalog for Unavailable {
    fn find_definition(&self, _kind: SymbolType, _line_text: &str) -> Option<SymbolDefinitionInfo> {
        None
    }

    fn has_definitions(&self, _kind: SymbolType) -> bool {
        false
    }
}

impl ActionCatalog for Unavailable {
    fn find_action(&self, _line_text: &str, _prefix: Option<&str>) -> Option<ActionInfo> {
        None
    }

    fn find_actions(&self, _prefix: &str) -> Vec<ActionInfo> {
        Vec::new()
    }
}

impl ValueTables for Unavailable {
    fn values(&self, _parameter_type: &str) -> Option<Vec<String>> {
        None
    }
}

impl GlobalVariables for Unavailable {
    fn index_of(&self, _name: &str) -> Option<u32> {
        None
    }
}

impl StaticMessages for Unavailable {
    fn id_of(&self, _alias: &str) -> Option<u32> {
        None
    }

    fn alias_of(&self, _id: u32) -> Option<String> {
        None
    }

    fn is_loaded(&self) -> bool {
        false
    }
}

impl MacroGlossary for Unavailable {
    fn contains(&self, _name: &str) -> bool {
        false
    }

    fn is_loaded(&self) -> bool {
        false
    }
}

#[async_trait]
impl QuestRegistry for Unavailable {
    async fn find(&self, _name: &str) -> Option<QuestInfo> {
        None
    }
}

/// A registry over a fixed set of quests, matched case-insensitively by name.
#[derive(Debug, Default, Clone)]
pub struct StaticQuestRegistry {
    quests: HashMap<String, QuestInfo>,
}

impl StaticQuestRegistry {
    pub fn new(quests: impl IntoIterator<Item = QuestInfo>) -> Self {
        let mut registry = Self::default();
        for quest in quests {
            registry.insert(quest);
        }
        registry
    }

    /// Add a quest; an existing entry with the same name is kept.
    pub fn insert(&mut self, quest: QuestInfo) {
        self.quests.entry(quest.name.to_ascii_lowercase()).or_insert(quest);
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

#[async_trait]
impl QuestRegistry for StaticQuestRegistry {
    async fn find(&self, name: &str) -> Option<QuestInfo> {
        self.quests.get(&name.to_ascii_lowercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_registry_ignores_case() {
        let registry = StaticQuestRegistry::new([QuestInfo {
            name: "S0000011".into(),
            source: Some("S0000011".into()),
            display_name: None,
        }]);
        assert!(registry.find("s0000011").await.is_some());
        assert!(registry.find("S0000012").await.is_none());
    }

    #[tokio::test]
    async fn unavailable_knows_nothing() {
        let services = QuestServices::unavailable();
        assert!(!services.static_messages.is_loaded());
        assert!(services.actions.find_action("end quest", None).is_none());
        assert!(Unavailable.find("S0000011").await.is_none());
    }
}
