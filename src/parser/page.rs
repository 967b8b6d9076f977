use scraper::{Html, Selector};
use serde_json::Value;

use crate::text;

/// A fetched job page, parsed once and queried by every adapter.
pub struct Page {
    doc: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    /// `content` of the first `<meta property=..>` or `<meta name=..>` tag with this key.
    pub fn meta(&self, key: &str) -> Option<String> {
        let css = format!(r#"meta[property="{key}"], meta[name="{key}"]"#);
        let sel = Selector::parse(&css).ok()?;
        self.doc
            .select(&sel)
            .find_map(|el| text::clean_opt(el.value().attr("content")))
    }

    /// Normalized text of the first element matching any selector in the list.
    /// Selectors are tried in order, so earlier ones take priority.
    pub fn first_text(&self, selectors: &[&str]) -> Option<String> {
        selectors.iter().find_map(|css| {
            let sel = Selector::parse(css).ok()?;
            self.doc
                .select(&sel)
                .find_map(|el| text::clean(&el.text().collect::<String>()))
        })
    }

    pub fn title(&self) -> Option<String> {
        self.first_text(&["head > title", "title"])
    }

    /// `JobPosting` objects from `<script type="application/ld+json">` blocks,
    /// including ones nested in arrays or `@graph`.
    pub fn job_postings(&self) -> Vec<Value> {
        let Ok(sel) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for script in self.doc.select(&sel) {
            let raw = script.text().collect::<String>();
            let Ok(parsed) = serde_json::from_str::<Value>(raw.trim()) else {
                continue;
            };
            collect_postings(&parsed, &mut found);
        }
        found
    }
}

fn collect_postings(value: &Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|v| collect_postings(v, out)),
        Value::Object(map) => {
            if is_job_posting(map.get("@type")) {
                out.push(value.clone());
            } else if let Some(graph) = map.get("@graph") {
                collect_postings(graph, out);
            }
        }
        _ => {}
    }
}

fn is_job_posting(ty: Option<&Value>) -> bool {
    match ty {
        Some(Value::String(s)) => s.eq_ignore_ascii_case("jobposting"),
        Some(Value::Array(types)) => types.iter().any(|t| is_job_posting(Some(t))),
        _ => false,
    }
}
