use super::{Parameterized, QuestResource};
use crate::lookup::{ActionCatalog, ActionInfo};
use crate::signature::{Parameter, SignatureTemplate};
use crate::text::{QuestToken, Range, TextLine};

/// One catalogued action or condition line inside a task.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    line: QuestToken,
    words: Vec<QuestToken>,
    info: ActionInfo,
    parameters: Vec<Parameter>,
}

impl Action {
    /// Match a line against the catalog overloads sharing its first word.
    pub fn parse(line: &TextLine<'_>, catalog: &dyn ActionCatalog) -> Option<Self> {
        let words = line.words();
        let first = words.first()?;
        let info = catalog.find_action(line.trimmed(), Some(&first.value))?;
        let values: Vec<&str> = words.iter().map(|word| word.value.as_str()).collect();
        let parameters = info.template.expand(&values);
        if parameters.len() != words.len() {
            return None;
        }
        Some(Self {
            line: line.trimmed_token(),
            words,
            info,
            parameters,
        })
    }

    pub fn first_word(&self) -> &str {
        &self.words[0].value
    }

    /// The trimmed source line.
    pub fn text(&self) -> &str {
        &self.line.value
    }

    pub fn info(&self) -> &ActionInfo {
        &self.info
    }

    pub fn template(&self) -> &SignatureTemplate {
        &self.info.template
    }

    pub fn is_condition(&self) -> bool {
        self.info.is_condition()
    }

    pub fn is_obsolete(&self) -> bool {
        self.info.obsolete
    }
}

impl QuestResource for Action {
    fn range(&self) -> Range {
        self.line.range()
    }

    fn block_range(&self) -> Range {
        self.line.range()
    }
}

impl Parameterized for Action {
    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn parameter_tokens(&self) -> &[QuestToken] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::signature::ParameterType;
    use quest_data::{ActionCategory, ActionDef, LookupTables};

    fn catalog() -> Catalog {
        let def = |category, overloads: &[&str], obsolete| ActionDef {
            category,
            overloads: overloads.iter().map(|o| o.to_string()).collect(),
            summary: String::new(),
            obsolete,
            source_name: None,
        };
        Catalog::new(&LookupTables {
            actions: vec![
                def(ActionCategory::Action, &["start timer ${1:_clock_}"], false),
                def(ActionCategory::Action, &["cure disease ${1:...disease}"], true),
                def(ActionCategory::Condition, &["when ${1:task} and ${2:...task}"], false),
            ],
            ..LookupTables::default()
        })
        .unwrap()
    }

    #[test]
    fn parameters_line_up_with_words() {
        let action = Action::parse(&TextLine::new(9, "    start timer _t_"), &catalog()).expect("action");
        assert_eq!(action.first_word(), "start");
        assert_eq!(action.range(), Range::on_line(9, 4, 19));
        assert_eq!(
            action.parameters()[2],
            Parameter::new(ParameterType::Symbol(Some(quest_data::SymbolType::Clock)), "_t_")
        );
        assert_eq!(action.parameter_range(2), Range::on_line(9, 16, 19));
        assert!(!action.is_condition());
    }

    #[test]
    fn variadic_words_are_absorbed() {
        let action = Action::parse(&TextLine::new(0, "cure disease Plague Pox"), &catalog()).expect("action");
        assert_eq!(action.parameters().len(), 4);
        assert!(action.is_obsolete());
        let condition = Action::parse(&TextLine::new(0, "when _a_ and _b_ _c_"), &catalog()).expect("condition");
        assert!(condition.is_condition());
        assert_eq!(condition.parameters()[4].kind, ParameterType::Task);
    }

    #[test]
    fn unknown_lines_are_not_actions() {
        assert!(Action::parse(&TextLine::new(0, "stop timer _t_"), &catalog()).is_none());
        assert!(Action::parse(&TextLine::new(0, "start timer"), &catalog()).is_none());
        assert!(Action::parse(&TextLine::new(0, ""), &catalog()).is_none());
    }
}
