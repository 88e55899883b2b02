//! Session-start catch-up: offline earnings and the daily login streak.
//!
//! Both run once, when a session starts, never per frame.

use crate::{
    config::GameConfig,
    event::GameEvent,
    state::EconomyState,
    types::{Money, Seconds},
};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfflineReport {
    /// Wall-clock seconds since the last save.
    pub elapsed:  Seconds,
    /// Seconds actually paid out after the cap.
    pub credited: Seconds,
    pub amount:   Money,
}

/// Earnings for the time away, or `None` when there is no previous
/// timestamp, the clock went backwards, or nothing would be paid.
pub fn offline_earnings(
    state:  &EconomyState,
    config: &GameConfig,
    now:    DateTime<Utc>,
) -> Option<OfflineReport> {
    let last = state.last_play_time?;
    let elapsed = (now - last).num_milliseconds() as f64 / 1000.0;
    if elapsed <= 0.0 {
        return None;
    }
    let credited = elapsed.min(config.offline.max_seconds);
    let amount = state.auto_income
        * credited
        * config.offline.efficiency
        * state.prestige_multiplier;
    if amount <= 0.0 {
        return None;
    }
    Some(OfflineReport { elapsed, credited, amount })
}

/// Credit offline earnings once.
pub fn apply_offline_progress(
    state:  &mut EconomyState,
    config: &GameConfig,
    now:    DateTime<Utc>,
) -> Option<GameEvent> {
    let report = offline_earnings(state, config, now)?;
    state.money += report.amount;
    state.highest_money = state.highest_money.max(state.money);
    log::info!(
        "offline for {:.0}s (credited {:.0}s): +{:.0}",
        report.elapsed,
        report.credited,
        report.amount
    );
    Some(GameEvent::OfflineEarnings {
        elapsed:  report.elapsed,
        credited: report.credited,
        amount:   report.amount,
    })
}

/// Advance the login streak for `today` and pay the daily reward.
/// A second login on the same date pays nothing.
pub fn register_login(
    state:  &mut EconomyState,
    config: &GameConfig,
    today:  NaiveDate,
) -> Option<GameEvent> {
    match state.last_login_date {
        Some(last) if last == today => return None,
        Some(last) if last > today => {
            // Clock moved backwards; keep the streak, pay nothing.
            log::warn!("login date {today} is before last login {last}");
            return None;
        }
        Some(last) if last.succ_opt() == Some(today) => {
            state.login_streak = state.login_streak.saturating_add(1);
        }
        _ => state.login_streak = 1,
    }
    state.last_login_date = Some(today);

    let days = state.login_streak.min(config.login.max_streak_days);
    let amount = config.login.reward_per_day * f64::from(days);
    state.money += amount;
    Some(GameEvent::DailyReward { streak: state.login_streak, amount })
}
