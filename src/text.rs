use std::sync::LazyLock;

use regex::Regex;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SLUG_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").unwrap());

/// Job-board names that show up in `og:site_name` and page titles but never
/// name the hiring company.
const PLATFORM_NAMES: &[&str] = &["workday", "myworkdayjobs", "linkedin", "greenhouse", "lever"];

/// Trim and collapse runs of whitespace into single spaces.
pub fn collapse(s: &str) -> String {
    WS_RE.replace_all(s.trim(), " ").to_string()
}

/// Full normalization for any extracted value. Empty results become `None`.
/// Input is already entity-decoded by the HTML parser, so it is never
/// re-parsed as markup.
pub fn clean(s: &str) -> Option<String> {
    let out = collapse(s);
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

pub fn clean_opt(s: Option<&str>) -> Option<String> {
    s.and_then(clean)
}

/// `acme-robotics_inc` -> `Acme Robotics Inc`
pub fn slug_to_name(slug: &str) -> String {
    SLUG_SPLIT_RE
        .split(slug)
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn is_platform_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    PLATFORM_NAMES.contains(&lower.as_str())
}

/// Normalized company candidate, rejecting bare job-board names.
pub fn clean_company(s: &str) -> Option<String> {
    clean(s).filter(|c| !is_platform_name(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace() {
        assert_eq!(collapse("  Senior\n\t Engineer  "), "Senior Engineer");
    }

    #[test]
    fn clean_drops_empty() {
        assert_eq!(clean("   \n "), None);
        assert_eq!(clean(" Acme\u{a0}Corp ").as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn clean_keeps_angle_brackets_and_literal_entities() {
        assert_eq!(clean("Engineer <Backend> & Ops").as_deref(), Some("Engineer <Backend> & Ops"));
        assert_eq!(clean("R&amp;D").as_deref(), Some("R&amp;D"));
    }

    #[test]
    fn slug_names() {
        assert_eq!(slug_to_name("acme-robotics"), "Acme Robotics");
        assert_eq!(slug_to_name("big_DATA.co"), "Big Data Co");
        assert_eq!(slug_to_name("--"), "");
    }

    #[test]
    fn platform_names_rejected() {
        assert_eq!(clean_company("LinkedIn"), None);
        assert_eq!(clean_company(" workday "), None);
        assert_eq!(clean_company("Lever Brothers").as_deref(), Some("Lever Brothers"));
    }
}
