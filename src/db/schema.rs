use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS words (
      id TEXT PRIMARY KEY,
      word TEXT NOT NULL,
      definition_en TEXT NOT NULL,
      example_en TEXT,
      translation_es TEXT,
      category TEXT NOT NULL DEFAULT '',
      seq INTEGER
    );

    CREATE TABLE IF NOT EXISTS progress (
      item_id TEXT PRIMARY KEY,
      easiness REAL NOT NULL DEFAULT 2.5,
      interval_days INTEGER NOT NULL DEFAULT 0,
      repetitions INTEGER NOT NULL DEFAULT 0,
      last_reviewed TEXT,
      next_review TEXT,
      total_answers INTEGER NOT NULL DEFAULT 0,
      correct_streak INTEGER NOT NULL DEFAULT 0,
      last_score REAL NOT NULL DEFAULT 0,
      favorite INTEGER NOT NULL DEFAULT 0,
      flagged_for_today INTEGER NOT NULL DEFAULT 0,
      FOREIGN KEY (item_id) REFERENCES words(id)
    );

    CREATE TABLE IF NOT EXISTS review_logs (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      item_id TEXT NOT NULL,
      quality INTEGER NOT NULL,
      score REAL NOT NULL DEFAULT 0,
      study_mode TEXT,
      reviewed_at TEXT NOT NULL,
      FOREIGN KEY (item_id) REFERENCES words(id)
    );

    CREATE TABLE IF NOT EXISTS settings (
      key TEXT PRIMARY KEY,
      value TEXT NOT NULL
    );

    -- Default settings
    INSERT OR IGNORE INTO settings (key, value) VALUES ('daily_goal', '20');
    INSERT OR IGNORE INTO settings (key, value) VALUES ('points', '0');
    INSERT OR IGNORE INTO settings (key, value) VALUES ('streak', '0');

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_progress_next_review ON progress(next_review);
    CREATE INDEX IF NOT EXISTS idx_words_category ON words(category);
    CREATE INDEX IF NOT EXISTS idx_review_logs_item_id ON review_logs(item_id);
    CREATE INDEX IF NOT EXISTS idx_review_logs_reviewed_at ON review_logs(reviewed_at);
    "#,
  )?;

  // ============================================================
  // MIGRATIONS FOR EXISTING DATABASES
  // These are no-ops for new databases (columns already exist)
  // ============================================================

  // Migration: flags joined the progress record after the first release
  add_column_if_missing(conn, "progress", "favorite", "INTEGER NOT NULL DEFAULT 0")?;
  add_column_if_missing(conn, "progress", "flagged_for_today", "INTEGER NOT NULL DEFAULT 0")?;

  // Migration: review logs gained the study mode and raw score
  add_column_if_missing(conn, "review_logs", "study_mode", "TEXT")?;
  add_column_if_missing(conn, "review_logs", "score", "REAL NOT NULL DEFAULT 0")?;

  Ok(())
}

fn add_column_if_missing(
  conn: &Connection,
  table: &str,
  column: &str,
  declaration: &str,
) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, declaration),
      [],
    )?;
  }
  Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  let query = format!(
    "SELECT COUNT(*) FROM pragma_table_info('{}') WHERE name = ?1",
    table
  );
  conn
    .query_row(&query, [column], |row| row.get::<_, i64>(0))
    .map(|n| n > 0)
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_migrations_run_twice() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();

    let goal: String = conn
      .query_row("SELECT value FROM settings WHERE key = 'daily_goal'", [], |row| row.get(0))
      .unwrap();
    assert_eq!(goal, "20");
  }

  #[test]
  fn test_column_exists() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();

    assert!(column_exists(&conn, "progress", "favorite"));
    assert!(!column_exists(&conn, "progress", "nonexistent"));
    assert!(!column_exists(&conn, "nonexistent", "favorite"));
  }
}
