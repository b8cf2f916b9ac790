use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
    /// Intensity bucket, 0 (none) to 4 (highest quartile).
    pub level: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionCalendar {
    pub total_contributions: u32,
    pub contribution_days: Vec<ContributionDay>,
}

impl ContributionCalendar {
    pub fn is_empty(&self) -> bool {
        self.total_contributions == 0 && self.contribution_days.is_empty()
    }
}

/// Maps a GraphQL `ContributionLevel` label onto 0..=4.
pub fn contribution_level(label: Option<&str>) -> u8 {
    match label {
        Some("FIRST_QUARTILE") => 1,
        Some("SECOND_QUARTILE") => 2,
        Some("THIRD_QUARTILE") => 3,
        Some("FOURTH_QUARTILE") => 4,
        _ => 0,
    }
}
