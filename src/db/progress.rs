//! The progress store: one ItemProgress row per catalog item.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::{ItemProgress, ReviewState};

pub fn put_progress(conn: &Connection, progress: &ItemProgress) -> Result<()> {
  conn.execute(
    r#"
    INSERT OR REPLACE INTO progress
      (item_id, easiness, interval_days, repetitions, last_reviewed, next_review,
       total_answers, correct_streak, last_score, favorite, flagged_for_today)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#,
    params![
      progress.item_id,
      progress.review.easiness,
      progress.review.interval_days,
      progress.review.repetitions,
      progress.review.last_reviewed.map(|t| t.to_rfc3339()),
      progress.review.next_review.map(|t| t.to_rfc3339()),
      progress.total_answers,
      progress.correct_streak,
      progress.last_score,
      progress.favorite,
      progress.flagged_for_today,
    ],
  )?;
  Ok(())
}

pub fn get_progress(conn: &Connection, item_id: &str) -> Result<Option<ItemProgress>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT item_id, easiness, interval_days, repetitions, last_reviewed, next_review,
           total_answers, correct_streak, last_score, favorite, flagged_for_today
    FROM progress WHERE item_id = ?1
    "#,
  )?;

  let mut rows = stmt.query(params![item_id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_progress(row)?))
  } else {
    Ok(None)
  }
}

/// Bulk-get: progress records for the given ids, keyed by id. Items with no
/// record are simply absent from the map.
pub fn get_progress_map(
  conn: &Connection,
  ids: &[String],
) -> Result<HashMap<String, ItemProgress>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT item_id, easiness, interval_days, repetitions, last_reviewed, next_review,
           total_answers, correct_streak, last_score, favorite, flagged_for_today
    FROM progress WHERE item_id = ?1
    "#,
  )?;

  let mut map = HashMap::new();
  for id in ids {
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
      let progress = row_to_progress(row)?;
      map.insert(progress.item_id.clone(), progress);
    }
  }
  Ok(map)
}

pub fn get_all_progress(conn: &Connection) -> Result<HashMap<String, ItemProgress>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT item_id, easiness, interval_days, repetitions, last_reviewed, next_review,
           total_answers, correct_streak, last_score, favorite, flagged_for_today
    FROM progress
    "#,
  )?;

  let records = stmt
    .query_map([], |row| row_to_progress(row))?
    .collect::<Result<Vec<_>>>()?;

  Ok(
    records
      .into_iter()
      .map(|p| (p.item_id.clone(), p))
      .collect(),
  )
}

/// Convert a database row to an ItemProgress struct. Malformed timestamps
/// decode to None, which the scheduler reads as "always due".
fn row_to_progress(row: &rusqlite::Row) -> Result<ItemProgress> {
  let last_reviewed: Option<String> = row.get(4)?;
  let next_review: Option<String> = row.get(5)?;

  Ok(ItemProgress {
    item_id: row.get(0)?,
    review: ReviewState {
      easiness: row.get(1)?,
      interval_days: row.get(2)?,
      repetitions: row.get(3)?,
      last_reviewed: last_reviewed.as_deref().and_then(parse_timestamp),
      next_review: next_review.as_deref().and_then(parse_timestamp),
    },
    total_answers: row.get(6)?,
    correct_streak: row.get(7)?,
    last_score: row.get(8)?,
    favorite: row.get(9)?,
    flagged_for_today: row.get(10)?,
  })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}
