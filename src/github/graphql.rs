use serde::{Deserialize, Serialize};

use crate::error::DegradedFetch;
use crate::models::{contribution_level, ContributionCalendar, ContributionDay};

/// GraphQL query for a user's trailing-year contribution calendar
pub const CONTRIBUTIONS_QUERY: &str = r#"
query($username: String!) {
  user(login: $username) {
    contributionsCollection {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            contributionCount
            contributionLevel
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
pub struct GraphQLRequest<'a> {
    pub query: &'a str,
    pub variables: ContributionQueryVariables<'a>,
}

#[derive(Debug, Serialize)]
pub struct ContributionQueryVariables<'a> {
    pub username: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: Option<ContributionQueryData>,
}

#[derive(Debug, Deserialize)]
pub struct ContributionQueryData {
    pub user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub contributions_collection: Option<ContributionsCollection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub contribution_calendar: Option<CalendarNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarNode {
    pub total_contributions: u32,
    pub weeks: Vec<WeekNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekNode {
    pub contribution_days: Vec<DayNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayNode {
    pub date: chrono::NaiveDate,
    pub contribution_count: u32,
    pub contribution_level: Option<String>,
}

impl GraphQLResponse {
    pub fn into_calendar(self) -> Option<ContributionCalendar> {
        let calendar = self
            .data?
            .user?
            .contributions_collection?
            .contribution_calendar?;

        let contribution_days = calendar
            .weeks
            .into_iter()
            .flat_map(|week| week.contribution_days)
            .map(|day| ContributionDay {
                date: day.date,
                count: day.contribution_count,
                level: contribution_level(day.contribution_level.as_deref()),
            })
            .collect();

        Some(ContributionCalendar {
            total_contributions: calendar.total_contributions,
            contribution_days,
        })
    }
}

/// Result of the contribution query. It never fails outright; a degraded
/// fetch stands in for the empty calendar.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarFetch {
    Fetched(ContributionCalendar),
    Degraded(DegradedFetch),
}

impl CalendarFetch {
    pub fn into_parts(self) -> (ContributionCalendar, Option<DegradedFetch>) {
        match self {
            CalendarFetch::Fetched(calendar) => (calendar, None),
            CalendarFetch::Degraded(reason) => (ContributionCalendar::default(), Some(reason)),
        }
    }

    pub fn into_calendar(self) -> ContributionCalendar {
        self.into_parts().0
    }
}
