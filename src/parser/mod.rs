pub mod classify;
pub mod extract;
pub mod page;
pub mod signal;

use tracing::debug;

use classify::{AdapterFamily, Classification};
use page::Page;
use signal::RawSignal;

/// Everything the pipeline learned about one URL before merging.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub classification: Classification,
    /// Output of the adapter picked by the classifier.
    pub specific: RawSignal,
    /// Generic fallback pass, used only to fill gaps in `specific`.
    pub fallback: RawSignal,
}

/// Classify the URL, run its adapter, then the generic fallback.
///
/// `html` is `None` (or blank) when the fetch failed; in that case only
/// URL-derived data survives and both signals are empty apart from `domain`.
pub fn extract_job(url: &str, html: Option<&str>) -> Extraction {
    let classification = classify::classify(url);
    let domain = Some(classification.domain.clone()).filter(|d| !d.is_empty());

    let Some(html) = html.filter(|h| !h.trim().is_empty()) else {
        debug!(family = %classification.family, "no page text, URL-only extraction");
        return Extraction {
            specific: RawSignal {
                domain,
                ..Default::default()
            },
            fallback: RawSignal::default(),
            classification,
        };
    };

    let page = Page::parse(html);
    let mut specific = extract::run_adapter(classification.family, &page, url);
    specific.domain = domain;

    // Generic pages already went through the generic adapter
    let fallback = match classification.family {
        AdapterFamily::Generic => RawSignal::default(),
        _ => extract::generic::extract(&page, url),
    };

    if specific.is_empty() {
        debug!(family = %classification.family, "adapter matched nothing on the page");
    }
    debug!(
        family = %classification.family,
        title = ?specific.title,
        company = ?specific.company,
        location = ?specific.location,
        "adapter finished"
    );

    Extraction {
        classification,
        specific,
        fallback,
    }
}
