use crate::activities::ActivityRegistry;
use crate::calendar::{DateRange, date_key};
use crate::daylog::{DayLog, LogCollection};
use crate::models::{ActivityRow, Completion, DashboardDay, DashboardResponse};
use chrono::NaiveDate;

/// Completion of one day against `total` activities.
///
/// `percent` rounds half up. With no activities configured the day is
/// vacuously complete at 0%.
pub fn compute_completion(log: &DayLog, total: usize) -> Completion {
    completion_of(log.count(), total)
}

fn completion_of(count: usize, total: usize) -> Completion {
    if total == 0 {
        return Completion {
            count,
            percent: 0,
            is_fully_complete: true,
        };
    }

    let percent = (200 * count + total) / (2 * total);
    Completion {
        count,
        percent: percent as u32,
        is_fully_complete: count == total,
    }
}

/// Consecutive fully complete days, walking `days` from the front.
///
/// `days` must be ordered most recent first. A day with no log ends the streak.
pub fn compute_streak(days: &[NaiveDate], logs: &LogCollection, total: usize) -> u32 {
    let mut streak = 0;
    for day in days {
        match logs.get(day) {
            Some(log) if compute_completion(log, total).is_fully_complete => streak += 1,
            _ => break,
        }
    }
    streak
}

pub fn build_dashboard_at(
    today: NaiveDate,
    range: DateRange,
    logs: &LogCollection,
    registry: &ActivityRegistry,
) -> DashboardResponse {
    let total = registry.len();
    let dates = range.days();

    let days: Vec<DashboardDay> = dates
        .iter()
        .map(|date| {
            let done = logs
                .get(date)
                .map(|log| log.completed_activities.clone())
                .unwrap_or_default();
            DashboardDay {
                date: date_key(*date),
                completion: completion_of(done.len(), total),
                activities: done.into_iter().collect(),
                is_today: *date == today,
            }
        })
        .collect();

    let rows = registry
        .iter()
        .map(|activity| ActivityRow {
            id: activity.id.clone(),
            label: activity.label.clone(),
            checked: dates
                .iter()
                .map(|date| logs.get(date).is_some_and(|log| log.is_done(&activity.id)))
                .collect(),
        })
        .collect();

    let most_recent_first: Vec<NaiveDate> = dates.iter().rev().copied().collect();
    let streak = compute_streak(&most_recent_first, logs, total);

    let done_today = range
        .contains(today)
        .then(|| logs.get(&today).map_or(0, DayLog::count));

    DashboardResponse {
        range,
        day_count: dates.len(),
        total_activities: total,
        streak,
        done_today,
        days,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::ActivityId;
    use chrono::Duration;

    const ALL: [&str; 4] = ["jogging", "pushups", "vibecode", "guitar"];

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn log_with(date: NaiveDate, ids: &[&str]) -> DayLog {
        DayLog::from_activities(date, ids.iter().map(|id| ActivityId::from(*id)))
    }

    fn logs(entries: &[(NaiveDate, &[&str])]) -> LogCollection {
        entries
            .iter()
            .map(|(date, ids)| (*date, log_with(*date, ids)))
            .collect()
    }

    #[test]
    fn completion_three_of_four() {
        let completion = compute_completion(&log_with(date(1), &ALL[..3]), 4);
        assert_eq!(completion.count, 3);
        assert_eq!(completion.percent, 75);
        assert!(!completion.is_fully_complete);
    }

    #[test]
    fn completion_all_four() {
        let completion = compute_completion(&log_with(date(1), &ALL[..]), 4);
        assert_eq!(completion.percent, 100);
        assert!(completion.is_fully_complete);
    }

    #[test]
    fn completion_rounds_half_up() {
        assert_eq!(completion_of(1, 3).percent, 33);
        assert_eq!(completion_of(2, 3).percent, 67);
        assert_eq!(completion_of(1, 8).percent, 13);
        assert_eq!(completion_of(0, 4).percent, 0);
    }

    #[test]
    fn completion_with_no_activities_is_vacuous() {
        let completion = compute_completion(&DayLog::empty(date(1)), 0);
        assert_eq!(completion.percent, 0);
        assert!(completion.is_fully_complete);
    }

    #[test]
    fn streak_is_zero_when_latest_day_incomplete() {
        let d = date(10);
        let d1 = d - Duration::days(1);
        let d2 = d - Duration::days(2);
        let logs = logs(&[(d2, &ALL[..]), (d1, &ALL[..]), (d, &ALL[..2])]);
        assert_eq!(compute_streak(&[d, d1, d2], &logs, 4), 0);
    }

    #[test]
    fn streak_counts_leading_complete_days() {
        let d = date(10);
        let d1 = d - Duration::days(1);
        let d2 = d - Duration::days(2);
        let logs = logs(&[(d, &ALL[..]), (d1, &ALL[..]), (d2, &ALL[..1])]);
        assert_eq!(compute_streak(&[d, d1, d2], &logs, 4), 2);
    }

    #[test]
    fn missing_day_breaks_streak() {
        let d = date(10);
        let d1 = d - Duration::days(1);
        let d2 = d - Duration::days(2);
        let logs = logs(&[(d, &ALL[..]), (d2, &ALL[..])]);
        assert_eq!(compute_streak(&[d, d1, d2], &logs, 4), 1);
        assert_eq!(compute_streak(&[], &logs, 4), 0);
    }

    #[test]
    fn dashboard_treats_absent_days_as_zero() {
        let registry = ActivityRegistry::default();
        let range = DateRange::new(date(1), date(4)).unwrap();
        let logs = logs(&[(date(3), &ALL[..]), (date(4), &ALL[..]), (date(1), &["guitar"][..])]);

        let dashboard = build_dashboard_at(date(4), range, &logs, &registry);
        assert_eq!(dashboard.day_count, 4);
        assert_eq!(dashboard.streak, 2);
        assert_eq!(dashboard.done_today, Some(4));
        assert_eq!(dashboard.days[1].date, "2026-03-02");
        assert_eq!(dashboard.days[1].completion.count, 0);
        assert!(dashboard.days[1].activities.is_empty());
        assert_eq!(dashboard.days[0].completion.percent, 25);
        assert!(dashboard.days[3].is_today);

        let guitar = dashboard.rows.iter().find(|row| row.id.as_str() == "guitar").unwrap();
        assert_eq!(guitar.checked, vec![true, false, true, true]);
    }

    #[test]
    fn dashboard_outside_today_has_no_today_count() {
        let registry = ActivityRegistry::default();
        let range = DateRange::new(date(1), date(2)).unwrap();
        let dashboard = build_dashboard_at(date(9), range, &LogCollection::new(), &registry);
        assert_eq!(dashboard.done_today, None);
        assert_eq!(dashboard.streak, 0);
    }
}
