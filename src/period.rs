use std::fmt;
use std::sync::LazyLock;

use anyhow::{ensure, Result};
use chrono::Datelike;
use regex::Regex;
use serde::Deserialize;

/// Season word followed by a year or a hiring term ("Summer 2026", "fall co-op").
static SEASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(spring|summer|fall|autumn)\s+(?:'?\d{2,4}|intern(?:ship)?s?|co-?op|term|semester|cohort)\b",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        };
        f.write_str(s)
    }
}

/// Month ranges for each hiring season, given as the month each one starts.
/// Months before `spring_start` wrap around into Fall, so every month maps to
/// exactly one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PeriodPolicy {
    pub spring_start: u32,
    pub summer_start: u32,
    pub fall_start: u32,
}

impl Default for PeriodPolicy {
    fn default() -> Self {
        Self {
            spring_start: 1,
            summer_start: 5,
            fall_start: 9,
        }
    }
}

impl PeriodPolicy {
    #[cfg(test)]
    pub fn new(spring_start: u32, summer_start: u32, fall_start: u32) -> Result<Self> {
        let policy = Self {
            spring_start,
            summer_start,
            fall_start,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=12).contains(&self.spring_start)
                && (1..=12).contains(&self.summer_start)
                && (1..=12).contains(&self.fall_start),
            "period start months must be within 1..=12, got {:?}",
            self
        );
        ensure!(
            self.spring_start < self.summer_start && self.summer_start < self.fall_start,
            "period start months must increase spring < summer < fall, got {:?}",
            self
        );
        Ok(())
    }

    /// `month` is 1-based.
    pub fn season_for_month(&self, month: u32) -> Season {
        if month >= self.fall_start || month < self.spring_start {
            Season::Fall
        } else if month >= self.summer_start {
            Season::Summer
        } else {
            Season::Spring
        }
    }

    pub fn infer<D: Datelike>(&self, date: &D) -> Season {
        self.season_for_month(date.month())
    }
}

/// Season named outright in free text ("Summer 2026 Intern"). A bare season
/// word ("Spring Boot", "Fall Protection") is not a hint.
pub fn season_hint(texts: &[&str]) -> Option<Season> {
    texts.iter().find_map(|t| {
        SEASON_RE.captures(t).map(|c| match c[1].to_lowercase().as_str() {
            "spring" => Season::Spring,
            "summer" => Season::Summer,
            _ => Season::Fall,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_policy_partitions_year() {
        let p = PeriodPolicy::default();
        let seasons: Vec<Season> = (1..=12).map(|m| p.season_for_month(m)).collect();
        assert_eq!(&seasons[0..4], &[Season::Spring; 4]);
        assert_eq!(&seasons[4..8], &[Season::Summer; 4]);
        assert_eq!(&seasons[8..12], &[Season::Fall; 4]);
        assert_eq!(p.season_for_month(3), Season::Spring);
        assert_eq!(p.season_for_month(6), Season::Summer);
        assert_eq!(p.season_for_month(11), Season::Fall);
    }

    #[test]
    fn custom_boundaries_wrap_into_fall() {
        let p = PeriodPolicy::new(2, 6, 10).unwrap();
        assert_eq!(p.season_for_month(1), Season::Fall);
        assert_eq!(p.season_for_month(2), Season::Spring);
        assert_eq!(p.season_for_month(5), Season::Spring);
        assert_eq!(p.season_for_month(6), Season::Summer);
        assert_eq!(p.season_for_month(9), Season::Summer);
        assert_eq!(p.season_for_month(10), Season::Fall);
        assert_eq!(p.season_for_month(12), Season::Fall);
    }

    #[test]
    fn every_valid_policy_is_a_partition() {
        for a in 1..=12 {
            for b in (a + 1)..=12 {
                for c in (b + 1)..=12 {
                    let p = PeriodPolicy::new(a, b, c).unwrap();
                    let counts = (1..=12).fold([0; 3], |mut acc, m| {
                        acc[p.season_for_month(m) as usize] += 1;
                        acc
                    });
                    assert_eq!(counts.iter().sum::<i32>(), 12);
                    assert_eq!(counts[Season::Spring as usize], (b - a) as i32);
                    assert_eq!(counts[Season::Summer as usize], (c - b) as i32);
                }
            }
        }
    }

    #[test]
    fn rejects_bad_boundaries() {
        assert!(PeriodPolicy::new(0, 5, 9).is_err());
        assert!(PeriodPolicy::new(1, 5, 13).is_err());
        assert!(PeriodPolicy::new(5, 5, 9).is_err());
        assert!(PeriodPolicy::new(9, 5, 1).is_err());
    }

    #[test]
    fn infers_from_dates() {
        let p = PeriodPolicy::default();
        let d = NaiveDate::from_ymd_opt(2026, 7, 4).unwrap();
        assert_eq!(p.infer(&d), Season::Summer);
        assert_eq!(p.infer(&d).to_string(), "Summer");
    }

    #[test]
    fn season_words_in_text() {
        assert_eq!(season_hint(&["Software Engineer Intern (Summer 2026)"]), Some(Season::Summer));
        assert_eq!(season_hint(&["Analyst", "autumn cohort"]), Some(Season::Fall));
        assert_eq!(season_hint(&["Waterfall Process Engineer", "springboard"]), None);
        assert_eq!(season_hint(&["Summer '27 Analyst"]), Some(Season::Summer));
        assert_eq!(season_hint(&["Fall co-op, Controls"]), Some(Season::Fall));
        assert_eq!(season_hint(&[]), None);
    }

    #[test]
    fn bare_season_words_are_not_hints() {
        assert_eq!(season_hint(&["Java Developer (Spring Boot) | Acme"]), None);
        assert_eq!(season_hint(&["Fall Protection Technician"]), None);
        assert_eq!(season_hint(&["Summer Camp Counselor"]), None);
    }
}
