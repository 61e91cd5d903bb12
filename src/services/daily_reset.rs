//! Background scheduler for the daily reset sweep.
//!
//! The task wakes at least every `check_interval` and always right after
//! local midnight. Inside the reset window it runs the sweep; the sweep
//! itself is idempotent per day, so extra wake-ups are harmless.

use chrono::{DateTime, Days, FixedOffset, TimeZone, Timelike};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::ResetConfig;
use crate::db::{self, SweepReport};
use crate::error::AppResult;
use crate::state::AppState;

/// Slack added when sleeping until midnight so the wake-up lands inside the window
const MIDNIGHT_SLACK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    OutsideWindow,
    Completed(SweepReport),
    Failed,
}

pub fn is_within_reset_window(now: DateTime<FixedOffset>, window_minutes: u32) -> bool {
    now.hour() == 0 && now.minute() < window_minutes
}

/// Time left until the next local midnight
fn until_next_midnight(now: DateTime<FixedOffset>) -> Duration {
    let next_midnight = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| now.offset().from_local_datetime(&naive).single());

    next_midnight
        .and_then(|midnight| (midnight - now).to_std().ok())
        .unwrap_or(Duration::ZERO)
}

/// How long to sleep before the next check
pub fn next_check_delay(
    now: DateTime<FixedOffset>,
    config: &ResetConfig,
    outcome: CheckOutcome,
) -> Duration {
    if outcome == CheckOutcome::Failed && is_within_reset_window(now, config.window_minutes) {
        return config.retry_delay.min(config.check_interval);
    }
    config
        .check_interval
        .min(until_next_midnight(now) + MIDNIGHT_SLACK)
}

/// Run the sweep for the clock's current day on the blocking pool
pub async fn run_sweep(state: AppState) -> AppResult<SweepReport> {
    let today = state.clock.today();
    let now = state.clock.now_utc();

    tokio::task::spawn_blocking(move || -> AppResult<SweepReport> {
        let mut conn = db::try_lock(&state.db)?;
        Ok(db::run_daily_reset(&mut conn, today, now)?)
    })
    .await?
}

/// Run the sweep if the clock is inside the reset window
pub async fn check_and_run(state: &AppState, config: &ResetConfig) -> CheckOutcome {
    let now = state.clock.now();
    if !is_within_reset_window(now, config.window_minutes) {
        return CheckOutcome::OutsideWindow;
    }

    match run_sweep(state.clone()).await {
        Ok(report) if report.already_ran => {
            debug!("Daily reset for {} already done", now.date_naive());
            CheckOutcome::Completed(report)
        }
        Ok(report) => {
            info!(
                "Daily reset for {}: {} words reclaimed, {} flags cleared",
                now.date_naive(),
                report.words_reclaimed,
                report.flags_cleared
            );
            CheckOutcome::Completed(report)
        }
        Err(e) => {
            error!("Daily reset failed: {}", e);
            CheckOutcome::Failed
        }
    }
}

/// Spawn the fire-and-forget scheduler task
pub fn spawn_daily_reset(state: AppState, config: ResetConfig) -> JoinHandle<()> {
    info!(
        "Daily reset scheduler started (window: {} min after midnight, check interval: {:?})",
        config.window_minutes, config.check_interval
    );

    tokio::spawn(async move {
        loop {
            let outcome = check_and_run(&state, &config).await;
            let delay = next_check_delay(state.clock.now(), &config, outcome);
            debug!("Next daily reset check in {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::testing::TestEnv;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn test_window_check() {
        assert!(is_within_reset_window(at("2026-10-20T00:00:00+07:00"), 5));
        assert!(is_within_reset_window(at("2026-10-20T00:04:59+07:00"), 5));
        assert!(!is_within_reset_window(at("2026-10-20T00:05:00+07:00"), 5));
        assert!(!is_within_reset_window(at("2026-10-20T01:02:00+07:00"), 5));
        assert!(!is_within_reset_window(at("2026-10-19T23:59:00+07:00"), 5));
    }

    #[test]
    fn test_delay_wakes_at_midnight() {
        let config = ResetConfig::default();
        let delay = next_check_delay(
            at("2026-10-19T23:30:00+07:00"),
            &config,
            CheckOutcome::OutsideWindow,
        );
        assert_eq!(delay, Duration::from_secs(30 * 60) + MIDNIGHT_SLACK);
    }

    #[test]
    fn test_delay_capped_by_interval() {
        let config = ResetConfig::default();
        let delay = next_check_delay(
            at("2026-10-19T10:00:00+07:00"),
            &config,
            CheckOutcome::OutsideWindow,
        );
        assert_eq!(delay, config.check_interval);
    }

    #[test]
    fn test_failed_sweep_retries_inside_window() {
        let config = ResetConfig::default();
        let delay = next_check_delay(
            at("2026-10-20T00:01:00+07:00"),
            &config,
            CheckOutcome::Failed,
        );
        assert_eq!(delay, config.retry_delay);

        // Past the window the failure waits for the next day
        let delay = next_check_delay(
            at("2026-10-20T00:30:00+07:00"),
            &config,
            CheckOutcome::Failed,
        );
        assert_eq!(delay, config.check_interval);
    }

    #[tokio::test]
    async fn test_check_and_run_inside_window() {
        let env = TestEnv::new().unwrap();
        let group = env.seed_group("G").unwrap();
        env.seed_word(group, "stale", 4, None).unwrap();

        let state = env.app_state(Clock::Fixed(at("2026-10-20T00:02:00+07:00"))).unwrap();
        let config = ResetConfig::default();

        match check_and_run(&state, &config).await {
            CheckOutcome::Completed(report) => {
                assert_eq!(report.words_reclaimed, 1);
                assert!(!report.already_ran);
            }
            other => panic!("expected a completed sweep, got {:?}", other),
        }

        // Second tick in the same window is a no-op
        match check_and_run(&state, &config).await {
            CheckOutcome::Completed(report) => assert!(report.already_ran),
            other => panic!("expected a completed sweep, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_and_run_reports_failure() {
        let env = TestEnv::new().unwrap();
        let group = env.seed_group("G").unwrap();
        let id = env.seed_word(group, "stale", 4, None).unwrap();
        env.set_studied_today(id, true).unwrap();

        let state = env.app_state(Clock::Fixed(at("2026-10-20T00:02:00+07:00"))).unwrap();
        // Fail the run marker, the last write of the sweep
        env.conn
            .execute_batch(
                r#"
                CREATE TRIGGER fail_run_marker BEFORE INSERT ON maintenance_runs
                BEGIN SELECT RAISE(ABORT, 'disk full'); END;
                "#,
            )
            .unwrap();

        let config = ResetConfig::default();
        assert_eq!(check_and_run(&state, &config).await, CheckOutcome::Failed);

        // Nothing from the failed sweep is kept
        let word = db::get_word_by_id(&env.conn, id).unwrap().unwrap();
        assert_eq!(word.level.value(), 4);
        assert!(word.studied_today);

        // The next tick inside the window succeeds
        env.conn.execute_batch("DROP TRIGGER fail_run_marker").unwrap();
        match check_and_run(&state, &config).await {
            CheckOutcome::Completed(report) => assert!(!report.already_ran),
            other => panic!("expected a completed sweep, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_and_run_outside_window() {
        let env = TestEnv::new().unwrap();
        let group = env.seed_group("G").unwrap();
        env.seed_word(group, "stale", 4, None).unwrap();

        let state = env.app_state(Clock::Fixed(at("2026-10-20T13:00:00+07:00"))).unwrap();
        let outcome = check_and_run(&state, &ResetConfig::default()).await;
        assert_eq!(outcome, CheckOutcome::OutsideWindow);
    }
}
