use std::sync::LazyLock;

use regex::Regex;

use crate::parser::page::Page;
use crate::parser::signal::RawSignal;
use crate::text;

static COMPANY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)jobs\.(?:eu\.)?lever\.co/([^/?#]+)").unwrap());

const TITLE: &[&str] = &[".posting-headline h2", "h2.posting-headline", "h2", "h1"];
const LOCATION: &[&str] = &[
    ".posting-categories .location",
    ".posting-categories .sort-by-location",
    ".location",
];

pub fn extract(page: &Page, url: &str) -> RawSignal {
    let title = page.first_text(TITLE);
    let location = page.first_text(LOCATION);
    let slug = COMPANY_RE.captures(url).map(|c| c[1].to_string());
    let company = slug
        .as_deref()
        .and_then(|s| text::clean_company(&text::slug_to_name(s)));

    RawSignal {
        raw_title: title.clone(),
        title,
        company,
        raw_company: slug,
        // category labels end with a " /" separator
        raw_location: location.clone(),
        location: location.and_then(|l| text::clean(l.trim_end_matches('/'))),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lever_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/lever.html").unwrap();
        let s = extract(&Page::parse(&html), "https://jobs.lever.co/foo/abcd-1234");
        assert_eq!(s.title.as_deref(), Some("Energy Systems Engineer"));
        assert_eq!(s.location.as_deref(), Some("Denver, CO"));
        assert_eq!(s.raw_location.as_deref(), Some("Denver, CO /"));
        assert_eq!(s.company.as_deref(), Some("Foo"));
        assert_eq!(s.raw_company.as_deref(), Some("foo"));
    }

    #[test]
    fn empty_page_still_names_company() {
        let s = extract(&Page::parse(""), "https://jobs.eu.lever.co/big-co/abcd-1234");
        assert_eq!(s.company.as_deref(), Some("Big Co"));
        assert_eq!(s.title, None);
    }
}
