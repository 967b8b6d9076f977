pub mod generic;
pub mod greenhouse;
pub mod lever;
pub mod linkedin;
pub mod workday;

use super::classify::AdapterFamily;
use super::page::Page;
use super::signal::RawSignal;

/// Run the adapter for `family`. Every adapter shares the same contract:
/// page + original URL in, `RawSignal` out, never an error.
pub fn run_adapter(family: AdapterFamily, page: &Page, url: &str) -> RawSignal {
    match family {
        AdapterFamily::Greenhouse => greenhouse::extract(page, url),
        AdapterFamily::Lever => lever::extract(page, url),
        AdapterFamily::Workday => workday::extract(page, url),
        AdapterFamily::LinkedIn => linkedin::extract(page, url),
        AdapterFamily::Generic => generic::extract(page, url),
    }
}
