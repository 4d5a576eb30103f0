use quest_data::SymbolType;

use super::{Parameterized, QuestResource};
use crate::lookup::SymbolCatalog;
use crate::parser::{SymbolNode, parse_symbol};
use crate::signature::{Parameter, SignatureMatch};
use crate::text::{QuestToken, Range, TextLine};

/// A prefix a symbol of some type may be written with, and what it expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolVariation {
    pub prefix: &'static str,
    pub description: &'static str,
    /// A prefix that reads better in message text, if there is one.
    pub suggestion: Option<&'static str>,
}

const fn variation(prefix: &'static str, description: &'static str) -> SymbolVariation {
    SymbolVariation {
        prefix,
        description,
        suggestion: None,
    }
}

const ITEM_VARIATIONS: &[SymbolVariation] = &[variation("_", "name of the item")];

const PERSON_VARIATIONS: &[SymbolVariation] = &[
    variation("_", "name of the person"),
    variation("__", "building where the person lives"),
    variation("___", "town where the person lives"),
    variation("=", "character class of the person"),
    variation("==", "faction of the person"),
];

const PLACE_VARIATIONS: &[SymbolVariation] = &[
    variation("_", "name of the place"),
    variation("__", "town of the place"),
    variation("___", "region of the place"),
];

const CLOCK_VARIATIONS: &[SymbolVariation] = &[
    SymbolVariation {
        prefix: "_",
        description: "travel time and distance",
        suggestion: Some("="),
    },
    variation("=", "number of days"),
];

const FOE_VARIATIONS: &[SymbolVariation] = &[variation("_", "name of the foe"), variation("=", "foe type")];

/// Every prefix message text may use for a symbol of `kind`.
pub fn symbol_variations(kind: SymbolType) -> &'static [SymbolVariation] {
    match kind {
        SymbolType::Item => ITEM_VARIATIONS,
        SymbolType::Person => PERSON_VARIATIONS,
        SymbolType::Place => PLACE_VARIATIONS,
        SymbolType::Clock => CLOCK_VARIATIONS,
        SymbolType::Foe => FOE_VARIATIONS,
    }
}

/// A typed symbol definition from the resource section.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    node: SymbolNode,
    words: Vec<QuestToken>,
    signature: SignatureMatch,
    block_range: Range,
}

impl Symbol {
    /// Parse a definition line and match it against the catalog's shapes for its type.
    pub fn parse(line: &TextLine<'_>, catalog: &dyn SymbolCatalog) -> Option<Self> {
        let node = parse_symbol(line)?;
        let words = line.words();
        let signature = match catalog.find_definition(node.kind, line.trimmed()) {
            Some(definition) => {
                let values: Vec<&str> = words.iter().map(|word| word.value.as_str()).collect();
                let parameters = definition.template.expand(&values);
                if parameters.len() == words.len() {
                    SignatureMatch::Valid(parameters)
                } else {
                    SignatureMatch::Invalid
                }
            },
            None if catalog.has_definitions(node.kind) => SignatureMatch::Invalid,
            None => SignatureMatch::NotRecognized,
        };
        Some(Self {
            block_range: line.trimmed_range(),
            node,
            words,
            signature,
        })
    }

    pub fn name(&self) -> &str {
        &self.node.name.value
    }

    pub fn kind(&self) -> SymbolType {
        self.node.kind
    }

    pub fn signature(&self) -> &SignatureMatch {
        &self.signature
    }

    pub fn node(&self) -> &SymbolNode {
        &self.node
    }

    pub fn variations(&self) -> &'static [SymbolVariation] {
        symbol_variations(self.node.kind)
    }

    /// The variation written with `prefix`, if the symbol's type has one.
    pub fn variation(&self, prefix: &str) -> Option<&'static SymbolVariation> {
        self.variations().iter().find(|variation| variation.prefix == prefix)
    }
}

impl QuestResource for Symbol {
    fn range(&self) -> Range {
        self.node.name.range()
    }

    fn block_range(&self) -> Range {
        self.block_range
    }
}

impl Parameterized for Symbol {
    fn parameters(&self) -> &[Parameter] {
        self.signature.parameters()
    }

    fn parameter_tokens(&self) -> &[QuestToken] {
        &self.words
    }
}
