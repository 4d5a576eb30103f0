use quest_data::SymbolType;

use crate::text::{QuestToken, TextLine};

/// `Type _name_ pattern...` line from the resource section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolNode {
    pub kind: SymbolType,
    pub type_token: QuestToken,
    pub name: QuestToken,
    /// Remainder of the line after the name, used to pick a definition shape.
    pub pattern: Option<QuestToken>,
}

/// Parse a symbol definition; the first word must be a symbol type keyword.
pub fn parse_symbol(line: &TextLine<'_>) -> Option<SymbolNode> {
    let mut words = line.words().into_iter();
    let type_token = words.next()?;
    let kind = SymbolType::from_keyword(&type_token.value)?;
    let name = words.next()?;
    let pattern = words.next().map(|first| {
        let rest = line.text[first.column..].trim_end();
        QuestToken::new(rest, line.number, first.column)
    });
    Some(SymbolNode {
        kind,
        type_token,
        name,
        pattern,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_with_pattern() {
        let node = parse_symbol(&TextLine::new(7, "Person _smith_ face 12 faction The Mages Guild")).expect("symbol");
        assert_eq!(node.kind, SymbolType::Person);
        assert_eq!(node.name.value, "_smith_");
        assert_eq!(
            node.pattern.map(|p| p.value),
            Some("face 12 faction The Mages Guild".to_string())
        );
    }

    #[test]
    fn bare_definition_has_no_pattern() {
        let node = parse_symbol(&TextLine::new(0, "  Item _note_")).expect("symbol");
        assert_eq!(node.name.column, 7);
        assert!(node.pattern.is_none());
    }

    #[test]
    fn unknown_keywords_and_missing_names_are_rejected() {
        assert!(parse_symbol(&TextLine::new(0, "Monster _rat_")).is_none());
        assert!(parse_symbol(&TextLine::new(0, "Item")).is_none());
        assert!(parse_symbol(&TextLine::new(0, "item _note_")).is_none());
    }
}
