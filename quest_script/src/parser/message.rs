use lazy_static::lazy_static;
use regex::Regex;

use super::symbols::{find_macros, find_symbol_occurrences};
use crate::text::{QuestToken, Range, TextLine};

lazy_static! {
    static ref NUMBERED_MESSAGE: Regex = Regex::new(r"^\s*Message:\s*(\d+)\s*$").expect("message pattern compiles");
    static ref STATIC_MESSAGE: Regex =
        Regex::new(r"^\s*([A-Za-z][A-Za-z0-9]*):\s*\[\s*(\d+)\s*\]\s*$").expect("static message pattern compiles");
}

/// A message header plus the tokens collected from its body so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageNode {
    pub id: QuestToken,
    pub alias: Option<QuestToken>,
    /// Trimmed range of the header line.
    pub range: Range,
    pub body_range: Option<Range>,
    pub macros: Vec<QuestToken>,
    pub symbols: Vec<QuestToken>,
}

impl MessageNode {
    /// Extend the body with `line`, collecting its macros and symbol references.
    pub fn append_body_line(&mut self, line: &TextLine<'_>) {
        let range = line.trimmed_range();
        self.body_range = Some(match self.body_range {
            Some(body) => body.union(&range),
            None => range,
        });
        let (macros, symbols) = scan_message_line(line);
        self.macros.extend(macros);
        self.symbols.extend(symbols);
    }
}

/// Parse either `Message: NNNN` or a static `Alias: [NNNN]` header.
pub fn parse_message(line: &TextLine<'_>) -> Option<MessageNode> {
    let (id, alias) = if let Some(caps) = NUMBERED_MESSAGE.captures(line.text) {
        (caps.get(1)?, None)
    } else {
        let caps = STATIC_MESSAGE.captures(line.text)?;
        (caps.get(2)?, Some(caps.get(1)?))
    };
    // Ids that overflow are not message headers.
    id.as_str().parse::<u32>().ok()?;
    Some(MessageNode {
        id: QuestToken::new(id.as_str(), line.number, id.start()),
        alias: alias.map(|a| QuestToken::new(a.as_str(), line.number, a.start())),
        range: line.trimmed_range(),
        body_range: None,
        macros: Vec::new(),
        symbols: Vec::new(),
    })
}

/// Context macros and symbol references found on one body line.
pub fn scan_message_line(line: &TextLine<'_>) -> (Vec<QuestToken>, Vec<QuestToken>) {
    let macros = find_macros(line.text)
        .into_iter()
        .map(|(offset, text)| QuestToken::new(text, line.number, offset))
        .collect();
    let symbols = find_symbol_occurrences(line.text)
        .into_iter()
        .map(|(offset, text)| QuestToken::new(text, line.number, offset))
        .collect();
    (macros, symbols)
}
