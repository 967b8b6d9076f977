use std::sync::LazyLock;

use regex::Regex;

use crate::parser::page::Page;
use crate::parser::signal::RawSignal;
use crate::text;

static BOARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:job-)?boards\.greenhouse\.io/(?:embed/job_app\?for=)?([^/?#&]+)").unwrap()
});

const TITLE: &[&str] = &["div#app_body h1.app-title", "h1.app-title", ".job__title h1", "h1"];
const COMPANY: &[&str] = &["div#header .company-name", ".company-name", "a.company-name"];
const LOCATION: &[&str] = &[".location", ".job__location", ".metadata .location"];

pub fn extract(page: &Page, url: &str) -> RawSignal {
    let title = page.first_text(TITLE);

    // Old boards render "at Acme" under the header
    let company_text = page.first_text(COMPANY);
    let board_slug = BOARD_RE
        .captures(url)
        .map(|c| c[1].to_string())
        .filter(|s| s != "embed");

    let (company, raw_company) = match company_text {
        Some(raw) => {
            let name = raw.strip_prefix("at ").unwrap_or(&raw);
            (text::clean_company(name), Some(raw.clone()))
        }
        None => (
            board_slug
                .as_deref()
                .and_then(|s| text::clean_company(&text::slug_to_name(s))),
            board_slug,
        ),
    };

    let location = page.first_text(LOCATION);

    RawSignal {
        raw_title: title.clone(),
        title,
        company,
        raw_company,
        raw_location: location.clone(),
        location,
        ..Default::default()
    }
}
