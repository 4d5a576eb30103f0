//! In-memory implementation of every synchronous lookup over [`LookupTables`].
//!
//! All templates are compiled once when the catalog is built, so a malformed
//! template surfaces here instead of while linting.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use log::{debug, warn};

use quest_data::{ActionCategory, LookupTables, SymbolType};

use crate::lookup::{
    ActionCatalog, ActionInfo, GlobalVariables, MacroGlossary, QuestServices, StaticMessages, SymbolCatalog,
    SymbolDefinitionInfo, ValueTables,
};
use crate::signature::{ParameterType, SignatureTemplate, TemplateError};

#[derive(Debug, Clone)]
struct CompiledSymbol {
    template: Arc<SignatureTemplate>,
    summary: String,
}

#[derive(Debug, Clone)]
struct CompiledAction {
    category: ActionCategory,
    overloads: Vec<Arc<SignatureTemplate>>,
    summary: String,
    obsolete: bool,
    source_name: Option<String>,
}

impl CompiledAction {
    fn info(&self, overload: usize) -> ActionInfo {
        ActionInfo {
            template: Arc::clone(&self.overloads[overload]),
            category: self.category,
            obsolete: self.obsolete,
            summary: self.summary.clone(),
            source_name: self.source_name.clone(),
            overload,
        }
    }
}

/// Lookup tables with their templates precompiled and indexed.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    symbols: HashMap<SymbolType, Vec<CompiledSymbol>>,
    actions: Vec<CompiledAction>,
    /// Action entry indices keyed by the first word of each overload.
    actions_by_prefix: HashMap<String, Vec<usize>>,
    values: BTreeMap<String, Vec<String>>,
    global_vars: HashMap<String, u32>,
    static_by_alias: HashMap<String, u32>,
    static_by_id: HashMap<u32, String>,
    macros: HashSet<String>,
    macros_loaded: bool,
}

impl Catalog {
    /// Compile every template in `tables`.
    ///
    /// # Errors
    /// Returns the first [`TemplateError`] found in a symbol or action template.
    pub fn new(tables: &LookupTables) -> Result<Self, TemplateError> {
        let mut catalog = Catalog::default();

        for def in &tables.symbols {
            catalog.symbols.entry(def.kind).or_default().push(CompiledSymbol {
                template: Arc::new(SignatureTemplate::compile(&def.signature)?),
                summary: def.summary.clone(),
            });
        }

        for def in &tables.actions {
            let index = catalog.actions.len();
            let mut overloads = Vec::with_capacity(def.overloads.len());
            for overload in &def.overloads {
                let template = SignatureTemplate::compile(overload)?;
                if let Some(first) = template.words().first() {
                    let entries = catalog.actions_by_prefix.entry(first.text().to_string()).or_default();
                    if entries.last() != Some(&index) {
                        entries.push(index);
                    }
                }
                overloads.push(Arc::new(template));
            }
            catalog.actions.push(CompiledAction {
                category: def.category,
                overloads,
                summary: def.summary.clone(),
                obsolete: def.obsolete,
                source_name: def.source_name.clone(),
            });
        }

        catalog.values = tables.values.clone();
        catalog.global_vars = tables.global_vars.iter().map(|g| (g.name.clone(), g.index)).collect();
        for message in &tables.static_messages {
            catalog.static_by_alias.insert(message.alias.clone(), message.id);
            catalog.static_by_id.entry(message.id).or_insert_with(|| message.alias.clone());
        }
        catalog.macros = tables.macros.iter().map(|m| m.name.trim_start_matches('%').to_string()).collect();
        catalog.macros_loaded = !tables.macros.is_empty();

        for table in catalog.missing_value_tables() {
            warn!("no value table `{table}`; its parameters are not checked");
        }

        debug!(
            "catalog built: {} symbol shapes, {} actions, {} value tables, {} global vars, {} static messages",
            catalog.symbols.values().map(Vec::len).sum::<usize>(),
            catalog.actions.len(),
            catalog.values.len(),
            catalog.global_vars.len(),
            catalog.static_by_alias.len()
        );
        Ok(catalog)
    }

    /// Attribute placeholders used by some template that have no value table.
    fn missing_value_tables(&self) -> BTreeSet<String> {
        let symbol_templates = self.symbols.values().flatten().map(|symbol| &symbol.template);
        let action_templates = self.actions.iter().flat_map(|action| &action.overloads);
        symbol_templates
            .chain(action_templates)
            .flat_map(|template| template.words())
            .filter_map(|word| match word.parameter_type() {
                ParameterType::Attribute(table) if !self.values.contains_key(&table) => Some(table),
                _ => None,
            })
            .collect()
    }

    /// Borrow this catalog as the full set of synchronous services.
    pub fn services(&self) -> QuestServices<'_> {
        QuestServices {
            symbols: self,
            actions: self,
            values: self,
            global_vars: self,
            static_messages: self,
            macros: self,
        }
    }
}

impl SymbolCatalog for Catalog {
    fn find_definition(&self, kind: SymbolType, line_text: &str) -> Option<SymbolDefinitionInfo> {
        self.symbols
            .get(&kind)?
            .iter()
            .find(|def| def.template.is_match(line_text))
            .map(|def| SymbolDefinitionInfo {
                kind,
                template: Arc::clone(&def.template),
                summary: def.summary.clone(),
            })
    }

    fn has_definitions(&self, kind: SymbolType) -> bool {
        self.symbols.get(&kind).is_some_and(|defs| !defs.is_empty())
    }
}

impl ActionCatalog for Catalog {
    fn find_action(&self, line_text: &str, prefix: Option<&str>) -> Option<ActionInfo> {
        let prefix = prefix.or_else(|| line_text.split_whitespace().next())?;
        self.actions_by_prefix.get(prefix)?.iter().find_map(|&index| {
            let action = &self.actions[index];
            action
                .overloads
                .iter()
                .position(|template| template.is_match(line_text))
                .map(|overload| action.info(overload))
        })
    }

    fn find_actions(&self, prefix: &str) -> Vec<ActionInfo> {
        let Some(indices) = self.actions_by_prefix.get(prefix) else {
            return Vec::new();
        };
        indices
            .iter()
            .flat_map(|&index| {
                let action = &self.actions[index];
                (0..action.overloads.len())
                    .filter(|&overload| {
                        action.overloads[overload]
                            .words()
                            .first()
                            .is_some_and(|word| word.text() == prefix)
                    })
                    .map(|overload| action.info(overload))
            })
            .collect()
    }
}

impl ValueTables for Catalog {
    fn values(&self, parameter_type: &str) -> Option<Vec<String>> {
        self.values.get(parameter_type).cloned()
    }
}

impl GlobalVariables for Catalog {
    fn index_of(&self, name: &str) -> Option<u32> {
        self.global_vars.get(name).copied()
    }
}

impl StaticMessages for Catalog {
    fn id_of(&self, alias: &str) -> Option<u32> {
        self.static_by_alias.get(alias).copied()
    }

    fn alias_of(&self, id: u32) -> Option<String> {
        self.static_by_id.get(&id).cloned()
    }

    fn is_loaded(&self) -> bool {
        !self.static_by_alias.is_empty()
    }
}

impl MacroGlossary for Catalog {
    fn contains(&self, name: &str) -> bool {
        self.macros.contains(name.trim_start_matches('%'))
    }

    fn is_loaded(&self) -> bool {
        self.macros_loaded
    }
}
