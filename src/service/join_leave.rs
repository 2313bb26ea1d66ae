use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::DatabaseConnection;

use crate::data::join_leave::JoinLeaveRepository;
use crate::error::AppError;
use crate::model::join_leave::{DayCount, JoinLeaveEvent, JoinLeaveStats};

/// Longest window `joinstats`/`leavestats` accept.
pub const MAX_STATS_DAYS: u32 = 90;

/// Width of the longest bar in the chart.
const BAR_WIDTH: u64 = 20;

/// Counts events per UTC day for the `days` days ending with `today`, oldest first.
///
/// Days without events are included with a count of zero; events outside the window
/// are ignored.
pub fn bucket_by_day(events: &[JoinLeaveEvent], days: u32, today: NaiveDate) -> Vec<DayCount> {
    let days = days.max(1);
    let first = today - Duration::days(days as i64 - 1);

    let mut buckets: Vec<DayCount> = (0..days)
        .map(|offset| DayCount {
            date: first + Duration::days(offset as i64),
            count: 0,
        })
        .collect();

    for event in events {
        let date = event.created_at.date_naive();
        if date < first || date > today {
            continue;
        }
        let index = (date - first).num_days() as usize;
        buckets[index].count += 1;
    }

    buckets
}

pub fn summarize(days: Vec<DayCount>) -> JoinLeaveStats {
    let total = days.iter().map(|d| d.count).sum();
    let peak = days
        .iter()
        .filter(|d| d.count > 0)
        // Ties go to the most recent day
        .max_by_key(|d| (d.count, d.date))
        .copied();

    JoinLeaveStats { days, total, peak }
}

/// Renders one line per day: `MM-DD │█████ 5`. Bars scale to the busiest day.
pub fn render_bar_chart(days: &[DayCount]) -> String {
    let max = days.iter().map(|d| d.count).max().unwrap_or(0);

    days.iter()
        .map(|day| {
            let width = if max == 0 {
                0
            } else {
                // Any non-zero day shows at least one block
                (day.count * BAR_WIDTH).div_ceil(max)
            };
            format!(
                "{} │{} {}",
                day.date.format("%m-%d"),
                "█".repeat(width as usize),
                day.count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct JoinLeaveService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> JoinLeaveService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn record(
        &self,
        guild_id: u64,
        user_id: u64,
        is_join: bool,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        JoinLeaveRepository::new(self.db)
            .record(guild_id, user_id, is_join, at)
            .await?;

        Ok(())
    }

    /// Per-day joins (or leaves) over the last `days` days including today.
    pub async fn stats(
        &self,
        guild_id: u64,
        is_join: bool,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<JoinLeaveStats, AppError> {
        if days == 0 || days > MAX_STATS_DAYS {
            return Err(AppError::BadRequest(format!(
                "Days must be between 1 and {}",
                MAX_STATS_DAYS
            )));
        }

        let today = now.date_naive();
        let since = (today - Duration::days(days as i64 - 1))
            .and_hms_opt(0, 0, 0)
            .map(|start| start.and_utc())
            .unwrap_or(now);

        let events = JoinLeaveRepository::new(self.db)
            .get_since(guild_id, is_join, since)
            .await?;

        Ok(summarize(bucket_by_day(&events, days, today)))
    }

    pub async fn clear(&self, guild_id: u64) -> Result<u64, AppError> {
        let removed = JoinLeaveRepository::new(self.db).clear(guild_id).await?;

        tracing::info!("Cleared {} join/leave events in guild {}", removed, guild_id);

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_utils::builder::TestBuilder;

    fn event(at: DateTime<Utc>) -> JoinLeaveEvent {
        JoinLeaveEvent {
            id: 0,
            guild_id: 1,
            user_id: 2,
            is_join: true,
            created_at: at,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn buckets_include_empty_days() {
        let today = day(2024, 3, 10);
        let events = vec![
            event(Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap()),
            event(Utc.with_ymd_and_hms(2024, 3, 10, 1, 0, 0).unwrap()),
            event(Utc.with_ymd_and_hms(2024, 3, 10, 23, 0, 0).unwrap()),
            // outside the window
            event(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
        ];

        let buckets = bucket_by_day(&events, 3, today);

        assert_eq!(
            buckets.iter().map(|d| d.count).collect::<Vec<_>>(),
            vec![1, 0, 2]
        );
        assert_eq!(buckets[0].date, day(2024, 3, 8));
    }

    #[test]
    fn summary_finds_total_and_peak() {
        let days = vec![
            DayCount { date: day(2024, 1, 1), count: 3 },
            DayCount { date: day(2024, 1, 2), count: 5 },
            DayCount { date: day(2024, 1, 3), count: 5 },
        ];

        let stats = summarize(days);

        assert_eq!(stats.total, 13);
        assert_eq!(stats.peak.unwrap().date, day(2024, 1, 3));
    }

    #[test]
    fn quiet_period_has_no_peak() {
        let stats = summarize(vec![DayCount { date: day(2024, 1, 1), count: 0 }]);

        assert_eq!(stats.total, 0);
        assert!(stats.peak.is_none());
    }

    #[test]
    fn chart_scales_bars_to_busiest_day() {
        let chart = render_bar_chart(&[
            DayCount { date: day(2024, 1, 1), count: 10 },
            DayCount { date: day(2024, 1, 2), count: 1 },
            DayCount { date: day(2024, 1, 3), count: 0 },
        ]);

        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], format!("01-01 │{} 10", "█".repeat(20)));
        assert_eq!(lines[1], "01-02 │██ 1");
        assert_eq!(lines[2], "01-03 │ 0");
    }

    /// Tests that stats only count the requested event kind.
    ///
    /// Expected: two joins today, the leave is ignored
    #[tokio::test]
    async fn stats_filter_by_kind() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::JoinLeaveEvent)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let now = Utc::now();

        let service = JoinLeaveService::new(db);
        service.record(1, 10, true, now).await?;
        service.record(1, 11, true, now).await?;
        service.record(1, 10, false, now).await?;

        let stats = service.stats(1, true, 7, now).await?;

        assert_eq!(stats.days.len(), 7);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.days[6].count, 2);

        Ok(())
    }
}
