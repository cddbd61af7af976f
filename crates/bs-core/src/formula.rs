use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Formula text as the editor stores it. Variables are written `"name"`,
/// lists `*name*` and string literals `'text'`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Formula {
    pub text: String,
}

impl Formula {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn number(value: f64) -> Self {
        Self::new(value.to_string())
    }

    /// Appends every variable and list name mentioned by this formula,
    /// skipping names already present. Tokens are read left to right, so a
    /// `*` between two operands is multiplication and never opens a list.
    pub fn collect_variable_and_list_names(
        &self,
        variables: &mut Vec<String>,
        lists: &mut Vec<String>,
    ) {
        let text = self.text.as_str();
        let mut pos = 0;
        while let Some(caps) = token_regex().captures_at(text, pos) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            if let Some(name) = caps.name("variable") {
                push_unique(variables, name.as_str());
            } else if let Some(name) = caps.name("list") {
                if follows_operand(&text[..whole.start()]) {
                    pos = whole.start() + 1;
                    continue;
                }
                push_unique(lists, name.as_str());
            }
            pos = whole.end();
        }
    }
}

/// Appends `name` unless an equal name is already present.
pub fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
    }
}

fn follows_operand(before: &str) -> bool {
    before.trim_end().chars().next_back().is_some_and(|last| {
        last.is_alphanumeric() || matches!(last, '_' | '.' | '"' | '\'' | ')')
    })
}

fn token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(concat!(
            r"'(?:\\.|[^'\\])*'",
            r#"|"(?P<variable>[^"]+)""#,
            r#"|\*(?P<list>[^*\s"](?:[^*"]*[^*\s"])?)\*"#,
        ))
        .expect("formula token regex")
    })
}
