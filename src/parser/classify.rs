use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

static WORKDAY_REQ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:[_-]|\b)R[-_]?(\d{3,})(?:\b|/|$)").unwrap());
static GH_JID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]gh_jid=(\d+)").unwrap());
static LINKEDIN_VIEW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/jobs/view/(?:[^/?#]*-)?(\d{6,})").unwrap());
static NUMERIC_JOB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/jobs/(\d+)(?:[/?#]|$)").unwrap());
static LEVER_POSTING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)jobs\.lever\.co/[^/]+/([a-z0-9-]{8,})(?:[/?#]|$)").unwrap()
});
static JOB_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:jobs?|postings)/([a-z0-9-]{8,})(?:[/?#]|$)").unwrap()
});

/// Host patterns checked in order. First hit wins, no match means Generic.
const HOST_TABLE: &[(&str, AdapterFamily)] = &[
    ("greenhouse.io", AdapterFamily::Greenhouse),
    ("lever.co", AdapterFamily::Lever),
    ("myworkdayjobs.com", AdapterFamily::Workday),
    ("linkedin.com", AdapterFamily::LinkedIn),
];

/// Second-level labels that sit under a country code (`acme.co.uk`).
const SECOND_LEVEL: &[&str] = &["co", "com", "ac", "org", "net", "gov", "edu"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdapterFamily {
    Greenhouse,
    Lever,
    Workday,
    LinkedIn,
    Generic,
}

impl fmt::Display for AdapterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdapterFamily::Greenhouse => "greenhouse",
            AdapterFamily::Lever => "lever",
            AdapterFamily::Workday => "workday",
            AdapterFamily::LinkedIn => "linkedin",
            AdapterFamily::Generic => "generic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub family: AdapterFamily,
    pub application_id: Option<String>,
    /// Lowercased host without `www.`, empty when the URL has none.
    pub host: String,
    /// Registrable domain, e.g. `greenhouse.io` for `boards.greenhouse.io`.
    pub domain: String,
}

/// Classify a job URL. Total over all inputs.
pub fn classify(url: &str) -> Classification {
    let host = host_of(url);
    let haystack = if host.is_empty() {
        url.to_lowercase()
    } else {
        host.clone()
    };

    let family = HOST_TABLE
        .iter()
        .find(|(pattern, _)| haystack.contains(pattern))
        .map(|(_, family)| *family)
        .unwrap_or(AdapterFamily::Generic);

    Classification {
        family,
        application_id: id_from_url(url),
        domain: registrable_domain(&host),
        host,
    }
}

/// Host of `url`, tolerating a missing scheme. Empty if nothing parses.
pub fn host_of(url: &str) -> String {
    let trimmed = url.trim();
    let parsed = Url::parse(trimmed).or_else(|_| Url::parse(&format!("https://{}", trimmed)));
    parsed
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .map(|h| h.trim_start_matches("www.").to_string())
        .unwrap_or_default()
}

pub fn registrable_domain(host: &str) -> String {
    if host.is_empty() || host.parse::<std::net::IpAddr>().is_ok() {
        return host.to_string();
    }
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let n = labels.len();
    if n <= 2 {
        return labels.join(".");
    }
    let under_cc = labels[n - 1].len() == 2 && SECOND_LEVEL.contains(&labels[n - 2]);
    let keep = if under_cc { 3 } else { 2 };
    labels[n - keep..].join(".")
}

/// Best-effort application ID embedded in the URL. First matching rule wins.
pub fn id_from_url(url: &str) -> Option<String> {
    if let Some(caps) = WORKDAY_REQ_RE.captures(url) {
        return Some(format!("R{}", &caps[1]));
    }
    [
        &*GH_JID_RE,
        &*LINKEDIN_VIEW_RE,
        &*NUMERIC_JOB_RE,
        &*LEVER_POSTING_RE,
        &*JOB_SLUG_RE,
    ]
    .iter()
    .find_map(|re| {
        re.captures(url)
            .map(|c| c[1].to_string())
            .filter(|id| id.chars().any(|ch| ch.is_ascii_digit()))
    })
}
