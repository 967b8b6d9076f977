use serde::Serialize;

/// Partial extraction result from one adapter run. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawSignal {
    pub application_id: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub domain: Option<String>,
    pub raw_title: Option<String>,
    pub raw_company: Option<String>,
    pub raw_location: Option<String>,
    /// Short page description, only used as industry classifier input.
    pub description: Option<String>,
}

impl RawSignal {
    pub fn is_empty(&self) -> bool {
        *self == RawSignal::default()
    }

    /// Fill every unset field from `other`. Fields already set are kept.
    pub fn fill_from(&mut self, other: RawSignal) {
        fn fill(slot: &mut Option<String>, value: Option<String>) {
            if slot.is_none() {
                *slot = value;
            }
        }
        fill(&mut self.application_id, other.application_id);
        fill(&mut self.company, other.company);
        fill(&mut self.title, other.title);
        fill(&mut self.location, other.location);
        fill(&mut self.domain, other.domain);
        fill(&mut self.raw_title, other.raw_title);
        fill(&mut self.raw_company, other.raw_company);
        fill(&mut self.raw_location, other.raw_location);
        fill(&mut self.description, other.description);
    }
}
