use quest_script::{ParameterType, SignatureTemplate, expand_against_line};

const FIXTURES: &str = include_str!("fixtures/signatures.txt");

fn fixtures() -> impl Iterator<Item = (&'static str, &'static str)> {
    FIXTURES
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split_once(" => ").expect("fixture is `template => line`"))
}

#[test]
fn fixture_lines_match_their_templates() {
    for (template, line) in fixtures() {
        let compiled = SignatureTemplate::compile(template).expect("template compiles");
        assert!(compiled.is_match(line), "`{line}` should match `{template}`");
    }
}

#[test]
fn expanded_values_rebuild_the_line() {
    for (template, line) in fixtures() {
        let words: Vec<&str> = line.split_whitespace().collect();
        let parameters = expand_against_line(template, &words).expect("template compiles");
        let values: Vec<&str> = parameters.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(values.join(" "), line, "template `{template}`");
    }
}

#[test]
fn variadic_attributes_keep_their_table() {
    let words = ["Person", "_npc_", "face", "4", "faction", "The", "Merchants"];
    let parameters = expand_against_line("Person ${1:_person_} face ${2:dd} faction ${3:...faction}", &words)
        .expect("template compiles");
    let tail: Vec<&ParameterType> = parameters[5..].iter().map(|p| &p.kind).collect();
    let faction = ParameterType::Attribute("faction".to_string());
    assert_eq!(tail, vec![&faction, &faction]);
}
