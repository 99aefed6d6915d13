//! Session bookkeeping: settings, points, daily goal counter, day streak.

use chrono::{DateTime, Local, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};
use serde::Serialize;

use crate::config;

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
  conn
    .query_row(
      "SELECT value FROM settings WHERE key = ?1",
      params![key],
      |row| row.get(0),
    )
    .optional()
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
  conn.execute(
    "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
    params![key, value],
  )?;
  Ok(())
}

fn get_setting_i64(conn: &Connection, key: &str, default: i64) -> Result<i64> {
  Ok(
    get_setting(conn, key)?
      .and_then(|v| v.parse().ok())
      .unwrap_or(default),
  )
}

/// Local-date key used for per-day counters, e.g. "2026-08-07".
pub fn today_key(now: DateTime<Utc>) -> String {
  now.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

pub fn get_daily_goal(conn: &Connection) -> Result<i64> {
  get_setting_i64(conn, "daily_goal", config::DEFAULT_DAILY_GOAL)
}

pub fn set_daily_goal(conn: &Connection, goal: i64) -> Result<()> {
  set_setting(conn, "daily_goal", &goal.to_string())
}

pub fn get_points(conn: &Connection) -> Result<i64> {
  get_setting_i64(conn, "points", 0)
}

/// Add points, floored at zero.
pub fn add_points(conn: &Connection, delta: i64) -> Result<i64> {
  let next = (get_points(conn)? + delta).max(0);
  set_setting(conn, "points", &next.to_string())?;
  Ok(next)
}

pub fn get_streak(conn: &Connection) -> Result<i64> {
  get_setting_i64(conn, "streak", 0)
}

pub fn get_daily_count(conn: &Connection, now: DateTime<Utc>) -> Result<i64> {
  get_setting_i64(conn, &format!("daily_count:{}", today_key(now)), 0)
}

/// Today's study status after the latest answer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DailyStatus {
  pub daily_count: i64,
  pub daily_goal: i64,
  pub streak: i64,
}

/// Count one study event for today. When the count reaches the daily goal,
/// the day streak advances, at most once per local day.
pub fn record_study_event(conn: &Connection, now: DateTime<Utc>) -> Result<DailyStatus> {
  let day = today_key(now);
  let count_key = format!("daily_count:{}", day);
  let daily_count = get_setting_i64(conn, &count_key, 0)? + 1;
  set_setting(conn, &count_key, &daily_count.to_string())?;

  let daily_goal = get_daily_goal(conn)?;
  let mut streak = get_streak(conn)?;
  if daily_count >= daily_goal && get_setting(conn, "streak_last_day")?.as_deref() != Some(day.as_str()) {
    streak += 1;
    set_setting(conn, "streak", &streak.to_string())?;
    set_setting(conn, "streak_last_day", &day)?;
  }

  Ok(DailyStatus {
    daily_count,
    daily_goal,
    streak,
  })
}
