use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use tracing::warn;

pub const UNKNOWN_INDUSTRY: &str = "Unknown";

/// Ordered keyword -> industry label table. The first keyword found wins.
#[derive(Debug, Clone)]
pub struct IndustryMap {
    rules: Vec<(String, String)>,
    default_label: String,
}

impl Default for IndustryMap {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            default_label: UNKNOWN_INDUSTRY.to_string(),
        }
    }
}

impl IndustryMap {
    pub fn new<I>(pairs: I, default_label: &str) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let rules = pairs
            .into_iter()
            .map(|(kw, label)| (kw.trim().to_lowercase(), label.trim().to_string()))
            .filter(|(kw, _)| !kw.is_empty())
            .collect();
        let default_label = if default_label.trim().is_empty() {
            UNKNOWN_INDUSTRY
        } else {
            default_label.trim()
        };
        Self {
            rules,
            default_label: default_label.to_string(),
        }
    }

    /// Parse an `industry_map.yml` style mapping (`keyword: Label`), keeping
    /// file order.
    pub fn from_yaml(src: &str, default_label: &str) -> Result<Self> {
        if src.trim().is_empty() {
            return Ok(Self::new(Vec::new(), default_label));
        }
        let mapping: Mapping = serde_yaml::from_str(src).context("industry map is not a YAML mapping")?;
        let pairs = mapping
            .iter()
            .filter_map(|(k, v)| match (scalar(k), scalar(v)) {
                (Some(k), Some(v)) => Some((k, v)),
                _ => {
                    warn!("skipping non-scalar industry map entry: {:?}", k);
                    None
                }
            })
            .collect::<Vec<_>>();
        Ok(Self::new(pairs, default_label))
    }

    /// Build from `Label: [keywords...]` rules. When `allowed` is non-empty
    /// labels are visited in that order and anything else is ignored.
    pub fn from_rules(rules: &Mapping, allowed: &[String], default_label: &str) -> Self {
        let keywords_for = |label: &str| -> Vec<String> {
            match rules.get(label) {
                Some(Value::Sequence(kws)) => kws.iter().filter_map(scalar).collect(),
                Some(v) => scalar(v).into_iter().collect(),
                None => Vec::new(),
            }
        };
        let labels: Vec<String> = if allowed.is_empty() {
            rules.keys().filter_map(scalar).collect()
        } else {
            allowed.to_vec()
        };
        let pairs = labels
            .iter()
            .flat_map(|label| {
                keywords_for(label)
                    .into_iter()
                    .map(move |kw| (kw, label.clone()))
            })
            .collect::<Vec<_>>();
        Self::new(pairs, default_label)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Label for the first keyword contained in title + company + description.
    pub fn classify(&self, title: &str, company: &str, description: Option<&str>) -> String {
        let blob = [title, company, description.unwrap_or("")].join(" ").to_lowercase();
        self.rules
            .iter()
            .find(|(kw, _)| blob.contains(kw.as_str()))
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| self.default_label.clone())
    }
}

fn scalar(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IndustryMap {
        IndustryMap::new(
            vec![
                ("bank".into(), "Finance".into()),
                ("Software".into(), "Tech".into()),
                ("energy".into(), "Energy".into()),
            ],
            "Other",
        )
    }

    #[test]
    fn first_keyword_in_map_order_wins() {
        let map = sample();
        // "software" and "bank" both match; "bank" comes first in the map
        assert_eq!(map.classify("Software Engineer", "First Bank", None), "Finance");
        assert_eq!(map.classify("SOFTWARE Engineer", "Acme", None), "Tech");
    }

    #[test]
    fn description_is_searched() {
        let map = sample();
        assert_eq!(
            map.classify("Analyst", "Acme", Some("Renewable energy storage")),
            "Energy"
        );
    }

    #[test]
    fn default_label_when_nothing_matches() {
        assert_eq!(sample().classify("Chef", "Diner", None), "Other");
        assert_eq!(IndustryMap::default().classify("", "", None), UNKNOWN_INDUSTRY);
        assert_eq!(IndustryMap::new(vec![], "  ").classify("x", "y", None), UNKNOWN_INDUSTRY);
    }

    #[test]
    fn yaml_map_keeps_file_order() {
        let src = "zeta: Last\nalpha: First\n2024: Year\n";
        let map = IndustryMap::from_yaml(src, "Unknown").unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.classify("zeta alpha", "", None), "Last");
        assert_eq!(map.classify("class of 2024", "", None), "Year");
        assert!(IndustryMap::from_yaml("", "Unknown").unwrap().is_empty());
        assert!(IndustryMap::from_yaml("- a\n- b\n", "Unknown").is_err());
    }

    #[test]
    fn rules_follow_allowed_order() {
        let rules: Mapping =
            serde_yaml::from_str("Tech: [software, data]\nFinance: [bank, data]\nRetail: shop\n").unwrap();
        let map = IndustryMap::from_rules(&rules, &["Finance".into(), "Tech".into()], "Unknown");
        assert_eq!(map.classify("Data Scientist", "", None), "Finance");
        assert_eq!(map.classify("Shop Manager", "", None), "Unknown");

        let all = IndustryMap::from_rules(&rules, &[], "Unknown");
        assert_eq!(all.classify("Data Scientist", "", None), "Tech");
        assert_eq!(all.classify("Shop Manager", "", None), "Retail");
    }
}
