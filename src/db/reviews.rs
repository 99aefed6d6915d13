//! Review event logging

use rusqlite::{params, Connection, Result};

use crate::domain::{ReviewLog, StudyMode};

pub fn insert_review_log(conn: &Connection, log: &ReviewLog) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO review_logs (item_id, quality, score, study_mode, reviewed_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
    params![
      log.item_id,
      log.quality,
      log.score,
      log.study_mode.map(|m| m.as_str()),
      log.reviewed_at.to_rfc3339(),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn count_reviews(conn: &Connection) -> Result<i64> {
  conn.query_row("SELECT COUNT(*) FROM review_logs", [], |row| row.get(0))
}

pub fn count_reviews_for_item(conn: &Connection, item_id: &str) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM review_logs WHERE item_id = ?1",
    params![item_id],
    |row| row.get(0),
  )
}

/// Most recent review events for one item, newest first.
pub fn get_recent_logs(conn: &Connection, item_id: &str, limit: usize) -> Result<Vec<ReviewLog>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, item_id, quality, score, study_mode, reviewed_at
    FROM review_logs
    WHERE item_id = ?1
    ORDER BY reviewed_at DESC, id DESC
    LIMIT ?2
    "#,
  )?;

  let logs = stmt
    .query_map(params![item_id, limit as i64], |row| {
      let study_mode: Option<String> = row.get(4)?;
      let reviewed_at: String = row.get(5)?;
      Ok(ReviewLog {
        id: row.get(0)?,
        item_id: row.get(1)?,
        quality: row.get(2)?,
        score: row.get(3)?,
        study_mode: study_mode.as_deref().and_then(StudyMode::from_str),
        reviewed_at: chrono::DateTime::parse_from_rfc3339(&reviewed_at)
          .map(|dt| dt.with_timezone(&chrono::Utc))
          .unwrap_or_else(|_| chrono::Utc::now()),
      })
    })?
    .collect::<Result<Vec<_>>>()?;

  Ok(logs)
}
