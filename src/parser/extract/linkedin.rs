use std::sync::LazyLock;

use regex::Regex;

use crate::parser::page::Page;
use crate::parser::signal::RawSignal;
use crate::text;

/// "Acme hiring Software Engineer in New York, NY | LinkedIn"
static HEADLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?) hiring (.+?) in (.+?)(?:\s*\|\s*LinkedIn)?$").unwrap()
});

const TITLE: &[&str] = &["h1.top-card-layout__title", "h1.topcard__title"];
const COMPANY: &[&str] = &["a.topcard__org-name-link", ".topcard__org-name-link"];
const LOCATION: &[&str] = &[".topcard__flavor--bullet"];

pub fn extract(page: &Page, _url: &str) -> RawSignal {
    let headline = page.meta("og:title");

    let mut signal = match headline.as_deref().and_then(|h| HEADLINE_RE.captures(h)) {
        Some(caps) => RawSignal {
            company: text::clean_company(&caps[1]),
            title: text::clean(&caps[2]),
            location: text::clean(&caps[3]),
            ..Default::default()
        },
        None => RawSignal {
            title: headline
                .as_deref()
                .and_then(|h| h.split('|').next())
                .and_then(text::clean),
            ..Default::default()
        },
    };
    signal.raw_title = headline;

    signal.fill_from(RawSignal {
        title: page.first_text(TITLE),
        company: page.first_text(COMPANY).and_then(|c| text::clean_company(&c)),
        location: page.first_text(LOCATION),
        ..Default::default()
    });
    signal
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.linkedin.com/jobs/view/3801234567";

    #[test]
    fn linkedin_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/linkedin.html").unwrap();
        let s = extract(&Page::parse(&html), URL);
        assert_eq!(s.company.as_deref(), Some("Contoso"));
        assert_eq!(s.title.as_deref(), Some("Machine Learning Intern"));
        assert_eq!(s.location.as_deref(), Some("Seattle, WA"));
        assert_eq!(
            s.raw_title.as_deref(),
            Some("Contoso hiring Machine Learning Intern in Seattle, WA | LinkedIn")
        );
    }

    #[test]
    fn plain_og_title() {
        let html = r#"<html><head><meta property="og:title" content="Staff Engineer | LinkedIn"></head>
            <body><a class="topcard__org-name-link">Fabrikam</a></body></html>"#;
        let s = extract(&Page::parse(html), URL);
        assert_eq!(s.title.as_deref(), Some("Staff Engineer"));
        assert_eq!(s.company.as_deref(), Some("Fabrikam"));
        assert_eq!(s.location, None);
    }
}
