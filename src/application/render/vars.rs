//! `{{ name }}` placeholder substitution.

use std::collections::BTreeMap;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Named, already-safe string values for a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    values: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateVars
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (name, value) in iter {
            vars.insert(name, value);
        }
        vars
    }
}

/// Replace every `{{ name }}` whose name is in `vars` with its value.
///
/// Whitespace inside the braces is ignored. Unknown placeholders stay as
/// written. The template is scanned once, left to right: inserted values are
/// copied verbatim and never scanned for placeholders themselves.
pub fn apply_vars(template: &str, vars: &TemplateVars) -> String {
    if vars.is_empty() {
        return template.to_string();
    }

    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find(OPEN) {
        output.push_str(&rest[..open]);
        let candidate = &rest[open..];
        let inner = &candidate[OPEN.len()..];

        let Some(close) = inner.find(CLOSE) else {
            output.push_str(candidate);
            return output;
        };

        match vars.get(inner[..close].trim()) {
            Some(value) => {
                output.push_str(value);
                rest = &inner[close + CLOSE.len()..];
            }
            None => {
                // Step over one brace only, so `{{{name}}}` still finds `{{name}}`.
                output.push('{');
                rest = &candidate[1..];
            }
        }
    }

    output.push_str(rest);
    output
}
