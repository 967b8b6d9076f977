use std::collections::HashMap;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::industry::IndustryMap;
use crate::parser::Extraction;
use crate::period::{season_hint, PeriodPolicy};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header row of the application log, in column order.
pub const COLUMNS: [&str; 15] = [
    "Application ID",
    "Date Applied",
    "Company",
    "Location",
    "Industry",
    "Position Title",
    "Period",
    "Application Link",
    "Source",
    "Application Status",
    "Notes",
    "Domain",
    "Raw Title",
    "Raw Company",
    "Raw Location",
];

/// One fully resolved application row. Empty string means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    pub application_id: String,
    pub date_applied: String,
    pub company: String,
    pub location: String,
    pub industry: String,
    pub position_title: String,
    pub period: String,
    pub application_link: String,
    pub source: String,
    pub application_status: String,
    pub notes: String,
    pub domain: String,
    pub raw_title: String,
    pub raw_company: String,
    pub raw_location: String,
}

impl CanonicalRecord {
    /// Values in `COLUMNS` order.
    pub fn to_row(&self) -> [&str; 15] {
        [
            self.application_id.as_str(),
            self.date_applied.as_str(),
            self.company.as_str(),
            self.location.as_str(),
            self.industry.as_str(),
            self.position_title.as_str(),
            self.period.as_str(),
            self.application_link.as_str(),
            self.source.as_str(),
            self.application_status.as_str(),
            self.notes.as_str(),
            self.domain.as_str(),
            self.raw_title.as_str(),
            self.raw_company.as_str(),
            self.raw_location.as_str(),
        ]
    }

    pub fn from_row(row: [String; 15]) -> Self {
        let [
            application_id,
            date_applied,
            company,
            location,
            industry,
            position_title,
            period,
            application_link,
            source,
            application_status,
            notes,
            domain,
            raw_title,
            raw_company,
            raw_location,
        ] = row;
        Self {
            application_id,
            date_applied,
            company,
            location,
            industry,
            position_title,
            period,
            application_link,
            source,
            application_status,
            notes,
            domain,
            raw_title,
            raw_company,
            raw_location,
        }
    }
}

/// Values the user passed on the command line. Only supplied fields are set,
/// and they are used verbatim.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub application_id: Option<String>,
    pub company: Option<String>,
    pub position_title: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub period: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Configured fallbacks used when neither an override nor the page supplies
/// a value.
#[derive(Debug, Clone)]
pub struct Defaults {
    pub source: String,
    pub status: String,
    pub date_format: String,
    /// Host (without `www.`) -> company name.
    pub company_map: HashMap<String, String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            source: String::new(),
            status: String::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            company_map: HashMap::new(),
        }
    }
}

pub struct Assembler<'a> {
    industries: &'a IndustryMap,
    periods: PeriodPolicy,
    defaults: &'a Defaults,
}

impl<'a> Assembler<'a> {
    pub fn new(industries: &'a IndustryMap, periods: PeriodPolicy, defaults: &'a Defaults) -> Self {
        Self {
            industries,
            periods,
            defaults,
        }
    }

    /// Merge overrides, adapter output, fallback output and defaults into one
    /// row. Precedence per field: override > adapter > fallback > default > "".
    pub fn assemble<Tz: TimeZone>(
        &self,
        url: &str,
        extraction: &Extraction,
        overrides: &Overrides,
        now: &DateTime<Tz>,
    ) -> CanonicalRecord
    where
        Tz::Offset: std::fmt::Display,
    {
        let cls = &extraction.classification;
        let s = &extraction.specific;
        let f = &extraction.fallback;

        let mapped_company = self
            .defaults
            .company_map
            .iter()
            .find(|(host, _)| host.trim_start_matches("www.").eq_ignore_ascii_case(&cls.host))
            .map(|(_, name)| name.as_str());

        let application_id = first_of([
            overrides.application_id.as_deref(),
            cls.application_id.as_deref(),
            s.application_id.as_deref(),
            f.application_id.as_deref(),
        ]);
        let company = first_of([
            overrides.company.as_deref(),
            s.company.as_deref(),
            f.company.as_deref(),
            mapped_company,
        ]);
        let position_title = first_of([
            overrides.position_title.as_deref(),
            s.title.as_deref(),
            f.title.as_deref(),
        ]);
        let location = first_of([
            overrides.location.as_deref(),
            s.location.as_deref(),
            f.location.as_deref(),
        ]);

        let raw_title = first_of([
            s.raw_title.as_deref(),
            f.raw_title.as_deref(),
            s.title.as_deref(),
            f.title.as_deref(),
        ]);
        let raw_company = first_of([
            s.raw_company.as_deref(),
            f.raw_company.as_deref(),
            s.company.as_deref(),
            f.company.as_deref(),
        ]);
        let raw_location = first_of([
            s.raw_location.as_deref(),
            f.raw_location.as_deref(),
            s.location.as_deref(),
            f.location.as_deref(),
        ]);

        let notes = first_of([overrides.notes.as_deref()]);

        let industry = match &overrides.industry {
            Some(industry) => industry.clone(),
            None => {
                let description = s.description.as_deref().or(f.description.as_deref());
                self.industries.classify(&position_title, &company, description)
            }
        };

        let period = match &overrides.period {
            Some(period) => period.clone(),
            None => season_hint(&[raw_title.as_str(), notes.as_str()])
                .unwrap_or_else(|| self.periods.infer(now))
                .to_string(),
        };

        CanonicalRecord {
            application_id,
            date_applied: format_timestamp(now, &self.defaults.date_format),
            company,
            location,
            industry,
            position_title,
            period,
            application_link: url.to_string(),
            source: first_of([overrides.source.as_deref(), Some(self.defaults.source.as_str())]),
            application_status: first_of([
                overrides.status.as_deref(),
                Some(self.defaults.status.as_str()),
            ]),
            notes,
            domain: first_of([s.domain.as_deref(), f.domain.as_deref(), Some(cls.domain.as_str())]),
            raw_title,
            raw_company,
            raw_location,
        }
    }
}

fn first_of<const N: usize>(candidates: [Option<&str>; N]) -> String {
    candidates
        .into_iter()
        .flatten()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Render `now` with a strftime pattern, falling back to the default pattern
/// when `fmt` has invalid specifiers.
pub fn format_timestamp<Tz: TimeZone>(now: &DateTime<Tz>, fmt: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let items = StrftimeItems::new(fmt);
    let valid = !fmt.is_empty() && !items.clone().any(|i| matches!(i, Item::Error));
    let pattern = if valid { fmt } else { DEFAULT_DATE_FORMAT };
    now.format(pattern).to_string()
}
