use std::sync::LazyLock;

use regex::Regex;

use crate::parser::classify::host_of;
use crate::parser::page::Page;
use crate::parser::signal::RawSignal;
use crate::text;

static TENANT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z0-9-]+)\.wd\d+\.myworkdayjobs\.com$").unwrap());
static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Location:\s*([^.|]+)").unwrap());

const TITLE: &[&str] = &[r#"[data-automation-id="jobPostingHeader"]"#, "h1"];
const LOCATION: &[&str] = &[r#"[data-automation-id="locations"] dd"#];
const REQUISITION: &[&str] = &[r#"[data-automation-id="requisitionId"] dd"#];

pub fn extract(page: &Page, url: &str) -> RawSignal {
    let title = page.first_text(TITLE);

    // Most Workday pages render client-side; the description meta tags are
    // often the only place the location shows up in the served HTML.
    let location = page.first_text(LOCATION).or_else(|| {
        ["twitter:description", "og:description"]
            .iter()
            .filter_map(|key| page.meta(key))
            .find_map(|desc| LOCATION_RE.captures(&desc).and_then(|c| text::clean(&c[1])))
    });

    let host = host_of(url);
    let tenant = TENANT_RE.captures(&host).map(|c| c[1].to_string());

    RawSignal {
        application_id: page.first_text(REQUISITION),
        raw_title: title.clone(),
        title,
        company: tenant
            .as_deref()
            .and_then(|t| text::clean_company(&text::slug_to_name(t))),
        raw_company: tenant,
        raw_location: location.clone(),
        location,
        ..Default::default()
    }
}
