//! Stream-view decorators.
//!
//! Optional passes layered over the base serializer by composition: a stats
//! attacher backed by the time-series store, a tag first/last-seen attacher
//! fed by the caller, and a field remover for public share views.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Group, Viewer};
use crate::serializers::group::{GroupSerializer, GroupView};
use crate::stores::TimeSeriesStore;

/// Fixed stats windows offered by the stream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsPeriod {
    /// 14 buckets of 24 hours.
    FourteenDays,
    /// 24 buckets of 1 hour.
    TwentyFourHours,
}

impl StatsPeriod {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "14d" => Some(StatsPeriod::FourteenDays),
            "24h" => Some(StatsPeriod::TwentyFourHours),
            _ => None,
        }
    }

    /// Key the bucket list is nested under in the output.
    pub fn key(self) -> &'static str {
        match self {
            StatsPeriod::FourteenDays => "14d",
            StatsPeriod::TwentyFourHours => "24h",
        }
    }

    pub fn segments(self) -> i32 {
        match self {
            StatsPeriod::FourteenDays => 14,
            StatsPeriod::TwentyFourHours => 24,
        }
    }

    pub fn interval(self) -> Duration {
        match self {
            StatsPeriod::FourteenDays => Duration::hours(24),
            StatsPeriod::TwentyFourHours => Duration::hours(1),
        }
    }
}

/// First/last occurrence of one tag value within a group, supplied by the
/// caller (already fetched for the surrounding tag search).
#[derive(Debug, Clone, Copy)]
pub struct TagValueWindow {
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// Stats-decorating serializer: wraps the base serializer and issues one
/// extra time-series range query per batch when a period is configured.
pub struct StreamGroupSerializer<'a> {
    base: GroupSerializer<'a>,
    time_series: &'a dyn TimeSeriesStore,
    stats_period: Option<StatsPeriod>,
    matching_event_id: Option<String>,
}

impl<'a> StreamGroupSerializer<'a> {
    pub fn new(base: GroupSerializer<'a>, time_series: &'a dyn TimeSeriesStore) -> Self {
        Self {
            base,
            time_series,
            stats_period: None,
            matching_event_id: None,
        }
    }

    pub fn with_stats_period(mut self, period: StatsPeriod) -> Self {
        self.stats_period = Some(period);
        self
    }

    /// Copied verbatim into every output record; used by search endpoints
    /// that matched on a single event.
    pub fn with_matching_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.matching_event_id = Some(event_id.into());
        self
    }

    pub async fn serialize_many(
        &self,
        groups: &[Group],
        viewer: &Viewer,
    ) -> AppResult<Vec<GroupView>> {
        let mut views = self.base.serialize_many(groups, viewer).await?;

        if let Some(period) = self.stats_period {
            let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
            let now = Utc::now();
            let start = now - period.interval() * (period.segments() - 1);
            let mut stats = self
                .time_series
                .range(&group_ids, start, now, period.interval().num_seconds())
                .await?;
            for (group, view) in groups.iter().zip(views.iter_mut()) {
                let buckets = stats.remove(&group.id).unwrap_or_default();
                view.stats = Some(HashMap::from([(period.key().to_string(), buckets)]));
            }
        }

        if let Some(event_id) = &self.matching_event_id {
            for view in &mut views {
                view.matching_event_id = Some(event_id.clone());
            }
        }

        Ok(views)
    }
}

/// Attaches the tag-scoped first/last-seen window to each view. The mapping
/// is caller-provided; no lookup happens here.
pub fn attach_tag_window(
    views: &mut [GroupView],
    groups: &[Group],
    tags: &HashMap<Uuid, TagValueWindow>,
) -> AppResult<()> {
    for (group, view) in groups.iter().zip(views.iter_mut()) {
        let window = tags.get(&group.id).ok_or_else(|| {
            AppError::NotFound(format!("tag value for group {} not found", group.id))
        })?;
        view.tag_first_seen = Some(window.first_seen);
        view.tag_last_seen = Some(window.last_seen);
    }
    Ok(())
}

/// Strips privileged fields for anonymous/public share consumption.
pub fn redact_shared(view: &mut GroupView) {
    view.annotations = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_periods() {
        assert_eq!(StatsPeriod::parse("14d"), Some(StatsPeriod::FourteenDays));
        assert_eq!(StatsPeriod::parse("24h"), Some(StatsPeriod::TwentyFourHours));
        assert_eq!(StatsPeriod::parse("7d"), None);
    }

    #[test]
    fn test_window_shape() {
        assert_eq!(StatsPeriod::FourteenDays.segments(), 14);
        assert_eq!(StatsPeriod::FourteenDays.interval(), Duration::hours(24));
        assert_eq!(StatsPeriod::TwentyFourHours.segments(), 24);
        assert_eq!(StatsPeriod::TwentyFourHours.interval(), Duration::hours(1));
    }
}
