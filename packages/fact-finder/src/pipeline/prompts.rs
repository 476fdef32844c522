//! Query and prompt templates.
//!
//! Placeholders are `{name}` tokens. Rendering is a single left-to-right
//! pass: substituted values are never re-scanned, names without a value are
//! left in the output untouched, and a name with a value that never appears
//! in the template is simply unused.

use crate::types::records::SearchHit;

pub const ENTITY: &str = "entity";
pub const RESULTS: &str = "results";

pub const DEFAULT_QUERY_TEMPLATE: &str = "Find the email address of {entity}";
pub const DEFAULT_PROMPT_TEMPLATE: &str =
    "Extract the email address of {entity} from the following web results: {results}.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

/// One piece of a template: literal text or a `{name}` token.
enum Segment<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments = Vec::new();
        let mut rest = self.source.as_str();

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find(['{', '}']) {
                Some(close) if after.as_bytes()[close] == b'}' => {
                    if open > 0 {
                        segments.push(Segment::Text(&rest[..open]));
                    }
                    segments.push(Segment::Placeholder(&after[..close]));
                    rest = &after[close + 1..];
                }
                // Lone `{` or `{…{`: keep the brace as text and rescan after it.
                _ => {
                    segments.push(Segment::Text(&rest[..=open]));
                    rest = after;
                }
            }
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest));
        }
        segments
    }

    /// Placeholder names in order of appearance, duplicates included.
    pub fn placeholders(&self) -> Vec<&str> {
        self.segments()
            .into_iter()
            .filter_map(|s| match s {
                Segment::Placeholder(name) => Some(name),
                Segment::Text(_) => None,
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.placeholders().contains(&name)
    }

    /// Placeholder names outside `known`; these render verbatim.
    pub fn unknown_placeholders(&self, known: &[&str]) -> Vec<String> {
        let mut unknown: Vec<String> = Vec::new();
        for name in self.placeholders() {
            if !known.contains(&name) && !unknown.iter().any(|u| u == name) {
                unknown.push(name.to_string());
            }
        }
        unknown
    }

    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in self.segments() {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    match values.iter().find(|(key, _)| *key == name) {
                        Some((_, value)) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                }
            }
        }
        out
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_TEMPLATE)
    }
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for Template {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

/// Search query for one entity.
pub fn render_query(template: &Template, entity: &str) -> String {
    template.render(&[(ENTITY, entity)])
}

/// Extraction prompt for one entity and its formatted results.
pub fn render_prompt(template: &Template, entity: &str, results: &str) -> String {
    template.render(&[(ENTITY, entity), (RESULTS, results)])
}

/// One paragraph per hit: title, snippet and link lines, in that order.
pub fn format_results(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| {
            format!(
                "Title: {}\nSnippet: {}\nLink: {}",
                hit.title, hit.snippet, hit.link
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
