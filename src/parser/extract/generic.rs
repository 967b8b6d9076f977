use serde_json::Value;

use crate::parser::classify::{host_of, registrable_domain};
use crate::parser::page::Page;
use crate::parser::signal::RawSignal;
use crate::text;

/// Separators job sites put between title and company in page titles.
const SEPARATORS: &[&str] = &[" | ", " - ", " – ", " — "];

/// OpenGraph / JSON-LD / `<title>` extraction. Works on any page and is also
/// run after the site adapters to fill whatever they left unset.
pub fn extract(page: &Page, url: &str) -> RawSignal {
    let mut signal = from_json_ld(page);
    signal.fill_from(from_opengraph(page));
    signal.fill_from(from_title_tag(page));
    if signal.company.is_none() {
        signal.company = company_from_domain(url);
    }
    signal
}

fn from_json_ld(page: &Page) -> RawSignal {
    let mut signal = RawSignal::default();
    for posting in page.job_postings() {
        signal.fill_from(RawSignal {
            application_id: identifier(&posting["identifier"]),
            title: posting["title"].as_str().and_then(text::clean),
            company: organization_name(&posting["hiringOrganization"]),
            location: job_location(&posting),
            ..Default::default()
        });
    }
    signal.raw_title = signal.title.clone();
    signal.raw_company = signal.company.clone();
    signal.raw_location = signal.location.clone();
    signal
}

fn from_opengraph(page: &Page) -> RawSignal {
    let og_title = page.meta("og:title");
    let (title, company) = og_title
        .as_deref()
        .map(split_title_company)
        .unwrap_or((None, None));
    let site_name = page.meta("og:site_name");
    let (company, raw_company) = match company {
        Some(c) => (Some(c), og_title.clone()),
        None => (site_name.as_deref().and_then(text::clean_company), site_name),
    };

    RawSignal {
        title,
        company,
        raw_title: og_title,
        raw_company,
        description: page
            .meta("og:description")
            .or_else(|| page.meta("description")),
        ..Default::default()
    }
}

fn from_title_tag(page: &Page) -> RawSignal {
    let Some(raw) = page.title() else {
        return RawSignal::default();
    };
    let (title, company) = split_title_company(&raw);
    RawSignal {
        title,
        raw_company: company.is_some().then(|| raw.clone()),
        company,
        raw_title: Some(raw),
        ..Default::default()
    }
}

/// `acme.com` -> `Acme`. Job-board domains yield nothing.
fn company_from_domain(url: &str) -> Option<String> {
    let domain = registrable_domain(&host_of(url));
    let name = domain.split('.').next()?;
    text::clean_company(&text::capitalize(name))
}

/// Guess (title, company) from a compound page title such as
/// "Software Engineer at Acme | Careers" or "Data Analyst - Acme".
pub fn split_title_company(raw: &str) -> (Option<String>, Option<String>) {
    if let Some((title, rest)) = raw.split_once(" at ") {
        return (text::clean(title), text::clean_company(head(rest)));
    }
    match first_separator(raw) {
        Some((title, rest)) => (text::clean(title), text::clean_company(head(rest))),
        None => (text::clean(raw), None),
    }
}

fn first_separator(s: &str) -> Option<(&str, &str)> {
    SEPARATORS
        .iter()
        .filter_map(|sep| s.find(sep).map(|i| (i, sep.len())))
        .min_by_key(|(i, _)| *i)
        .map(|(i, len)| (&s[..i], &s[i + len..]))
}

fn head(s: &str) -> &str {
    first_separator(s).map(|(h, _)| h).unwrap_or(s)
}

fn identifier(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => text::clean(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("value").and_then(identifier),
        _ => None,
    }
}

fn organization_name(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => text::clean_company(s),
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .and_then(text::clean_company),
        _ => None,
    }
}

fn job_location(posting: &Value) -> Option<String> {
    let place = match &posting["jobLocation"] {
        Value::Array(places) => places.first().cloned().unwrap_or(Value::Null),
        other => other.clone(),
    };
    let address = &place["address"];
    let country = match &address["addressCountry"] {
        Value::Object(map) => map.get("name").and_then(Value::as_str),
        other => other.as_str(),
    };
    let parts: Vec<&str> = [
        address["addressLocality"].as_str(),
        address["addressRegion"].as_str(),
        country,
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .collect();

    if !parts.is_empty() {
        return text::clean(&parts.join(", "));
    }
    match posting["jobLocationType"].as_str() {
        Some(t) if t.eq_ignore_ascii_case("TELECOMMUTE") => Some("Remote".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_compound_titles() {
        let cases = [
            ("Software Engineer at Acme | Careers", Some("Software Engineer"), Some("Acme")),
            ("Data Analyst - Acme", Some("Data Analyst"), Some("Acme")),
            ("Designer | Widgets Inc - Jobs", Some("Designer"), Some("Widgets Inc")),
            ("Backend Engineer – Greenhouse", Some("Backend Engineer"), None),
            ("Just A Title", Some("Just A Title"), None),
            ("C|C++ Developer - Acme", Some("C|C++ Developer"), Some("Acme")),
        ];
        for (raw, title, company) in cases {
            let (t, c) = split_title_company(raw);
            assert_eq!(t.as_deref(), title, "{}", raw);
            assert_eq!(c.as_deref(), company, "{}", raw);
        }
    }

    #[test]
    fn generic_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/generic.html").unwrap();
        let s = extract(&Page::parse(&html), "https://careers.initech.com/openings/4411");
        // JSON-LD wins over OpenGraph
        assert_eq!(s.title.as_deref(), Some("Platform Engineer"));
        assert_eq!(s.company.as_deref(), Some("Initech"));
        assert_eq!(s.location.as_deref(), Some("Austin, TX, US"));
        assert_eq!(s.application_id.as_deref(), Some("INI-4411"));
        assert_eq!(
            s.description.as_deref(),
            Some("Build the platform that powers fintech payments.")
        );
    }

    #[test]
    fn escaped_markup_in_og_title_survives() {
        let html = r#"<html><head>
            <meta property="og:title" content="Engineer &lt;Backend&gt; &amp; Ops - Acme">
            </head></html>"#;
        let s = extract(&Page::parse(html), "https://jobs.example.org/eng");
        assert_eq!(s.title.as_deref(), Some("Engineer <Backend> & Ops"));
        assert_eq!(s.company.as_deref(), Some("Acme"));
        assert_eq!(s.raw_title.as_deref(), Some("Engineer <Backend> & Ops - Acme"));
    }

    #[test]
    fn opengraph_then_title_tag() {
        let html = r#"<html><head>
            <title>Ignored Title - Ignored</title>
            <meta property="og:title" content="Product Manager at Globex">
            <meta property="og:site_name" content="Lever">
            </head></html>"#;
        let s = extract(&Page::parse(html), "https://jobs.example.org/pm");
        assert_eq!(s.title.as_deref(), Some("Product Manager"));
        assert_eq!(s.company.as_deref(), Some("Globex"));
        assert_eq!(s.raw_title.as_deref(), Some("Product Manager at Globex"));
        assert_eq!(s.raw_company.as_deref(), Some("Product Manager at Globex"));
    }

    #[test]
    fn title_tag_only() {
        let html = "<html><head><title>QA Lead | Hooli</title></head><body></body></html>";
        let s = extract(&Page::parse(html), "https://hooli.xyz/jobs/qa");
        assert_eq!(s.title.as_deref(), Some("QA Lead"));
        assert_eq!(s.company.as_deref(), Some("Hooli"));
        assert_eq!(s.raw_title.as_deref(), Some("QA Lead | Hooli"));
    }

    #[test]
    fn company_from_domain_as_last_resort() {
        let s = extract(&Page::parse("<html></html>"), "https://www.umbrella.co.uk/jobs/1");
        assert_eq!(s.company.as_deref(), Some("Umbrella"));
        assert_eq!(s.title, None);

        let s = extract(&Page::parse("<html></html>"), "https://boards.greenhouse.io/x/jobs/1");
        assert_eq!(s.company, None);
    }

    #[test]
    fn remote_postings() {
        let posting: Value = serde_json::json!({
            "@type": "JobPosting",
            "jobLocationType": "TELECOMMUTE"
        });
        assert_eq!(job_location(&posting).as_deref(), Some("Remote"));
        assert_eq!(identifier(&serde_json::json!({"value": 77})).as_deref(), Some("77"));
    }
}
