use chrono::NaiveDate;

use crate::models::ContributionDay;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

/// Current and longest runs of days with at least one contribution.
///
/// Input order does not matter: the longest run is scanned over a
/// chronological copy and the current run over a most-recent-first copy.
pub fn calculate_streaks(days: &[ContributionDay], today: NaiveDate) -> Streaks {
    if days.is_empty() {
        return Streaks::default();
    }

    let mut ordered = days.to_vec();
    ordered.sort_by_key(|d| d.date);
    let longest = longest_streak(&ordered);

    ordered.reverse();
    let current = current_streak(&ordered, today);

    tracing::debug!("Streaks over {} days: current {}, longest {}", days.len(), current, longest);
    Streaks { current, longest }
}

/// Longest run of non-zero days in a chronological slice.
pub fn longest_streak(chronological: &[ContributionDay]) -> u32 {
    let mut longest = 0;
    let mut running = 0;

    for day in chronological {
        if day.count > 0 {
            running += 1;
            longest = longest.max(running);
        } else {
            running = 0;
        }
    }

    longest
}

/// Run of non-zero days ending today (or yesterday, when today has no
/// contributions yet) in a most-recent-first slice.
///
/// Entries dated after `today` are ignored; `today` is a UTC date while the
/// calendar may run ahead in the user's time zone. After those, entry `i`
/// must lie exactly `i` days before `today`; the first entry that doesn't,
/// or that has no contributions, ends the run. A zero-count entry for
/// today itself is skipped.
pub fn current_streak(most_recent_first: &[ContributionDay], today: NaiveDate) -> u32 {
    let mut current = 0;
    let past = most_recent_first.iter().skip_while(|day| day.date > today);

    for (index, day) in past.enumerate() {
        let offset = (today - day.date).num_days();
        if offset != index as i64 {
            break;
        }

        if day.count > 0 {
            current += 1;
        } else if offset == 0 {
            continue;
        } else {
            break;
        }
    }

    current
}
