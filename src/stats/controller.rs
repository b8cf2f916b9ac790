use std::sync::{Arc, Mutex, PoisonError};
use chrono::{DateTime, Utc};

use crate::models::StatsSnapshot;
use crate::stats::aggregator::StatsAggregator;
use crate::stats::scheduler::RefreshTask;

/// What a view needs to render the stats panel.
#[derive(Debug, Clone, Default)]
pub struct StatsState {
    pub stats: Option<StatsSnapshot>,
    pub loading: bool,
    pub error: Option<String>,
    pub cache_age_hours: Option<f64>,
}

impl StatsState {
    pub fn last_updated_text(&self, now: DateTime<Utc>) -> Option<String> {
        self.stats
            .as_ref()
            .map(|s| format_last_updated(s.last_updated, now))
    }
}

/// Human-readable age of a snapshot, e.g. "Updated 3 hours ago".
pub fn format_last_updated(last_updated: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = now.signed_duration_since(last_updated).num_hours();

    match hours {
        h if h < 1 => "Updated just now".to_string(),
        1 => "Updated 1 hour ago".to_string(),
        h if h < 24 => format!("Updated {} hours ago", h),
        h => match h / 24 {
            1 => "Updated 1 day ago".to_string(),
            days => format!("Updated {} days ago", days),
        },
    }
}

/// Binds one username (and optional token) to an aggregator and tracks
/// loading/error state across loads. A failed load keeps the last stats.
pub struct StatsController {
    aggregator: Arc<StatsAggregator>,
    username: String,
    credential: Option<String>,
    state: Mutex<StatsState>,
}

impl StatsController {
    pub fn new(aggregator: Arc<StatsAggregator>, username: impl Into<String>, credential: Option<String>) -> Self {
        Self {
            aggregator,
            username: username.into(),
            credential,
            state: Mutex::new(StatsState {
                loading: true,
                ..StatsState::default()
            }),
        }
    }

    pub fn state(&self) -> StatsState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn update<F: FnOnce(&mut StatsState)>(&self, f: F) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    pub async fn load(&self, force_refresh: bool) -> StatsState {
        self.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self
            .aggregator
            .get_stats(&self.username, self.credential.as_deref(), force_refresh)
            .await;

        match result {
            Ok(snapshot) => {
                let cache_age_hours = self.aggregator.cache_age_hours();
                self.update(|s| {
                    s.stats = Some(snapshot);
                    s.cache_age_hours = cache_age_hours;
                    s.loading = false;
                });
            }
            Err(e) => {
                tracing::error!("Loading GitHub stats for {} failed: {}", self.username, e);
                self.update(|s| {
                    s.error = Some(e.to_string());
                    s.loading = false;
                });
            }
        }

        self.state()
    }

    pub async fn refresh(&self) -> StatsState {
        self.load(true).await
    }

    /// Loads now and then every `every`, handing each resulting state to
    /// `on_update`.
    pub fn spawn_periodic<F>(self: &Arc<Self>, every: std::time::Duration, on_update: F) -> RefreshTask
    where
        F: Fn(&StatsState) + Send + Sync + 'static,
    {
        let controller = Arc::clone(self);
        let on_update = Arc::new(on_update);

        RefreshTask::spawn(every, move || {
            let controller = Arc::clone(&controller);
            let on_update = Arc::clone(&on_update);
            async move {
                let state = controller.load(false).await;
                on_update(&state);
            }
        })
    }
}
