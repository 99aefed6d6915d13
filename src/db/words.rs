//! Word catalog CRUD and query operations

use rusqlite::{params, Connection, Result};

use crate::domain::WordItem;

pub fn upsert_word(conn: &Connection, word: &WordItem) -> Result<()> {
  conn.execute(
    r#"
    INSERT INTO words (id, word, definition_en, example_en, translation_es, category, seq)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(id) DO UPDATE SET
      word = excluded.word,
      definition_en = excluded.definition_en,
      example_en = excluded.example_en,
      translation_es = excluded.translation_es,
      category = excluded.category,
      seq = excluded.seq
    "#,
    params![
      word.id,
      word.word,
      word.definition_en,
      word.example_en,
      word.translation_es,
      word.category,
      word.seq,
    ],
  )?;
  Ok(())
}

pub fn get_word(conn: &Connection, id: &str) -> Result<Option<WordItem>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, word, definition_en, example_en, translation_es, category, seq
    FROM words WHERE id = ?1
    "#,
  )?;

  let mut rows = stmt.query(params![id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_word(row)?))
  } else {
    Ok(None)
  }
}

pub fn get_all_words(conn: &Connection) -> Result<Vec<WordItem>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, word, definition_en, example_en, translation_es, category, seq
    FROM words
    ORDER BY seq ASC, id ASC
    "#,
  )?;

  let words = stmt
    .query_map([], |row| row_to_word(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(words)
}

pub fn get_words_by_category(conn: &Connection, category: &str) -> Result<Vec<WordItem>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, word, definition_en, example_en, translation_es, category, seq
    FROM words
    WHERE category = ?1
    ORDER BY seq ASC, id ASC
    "#,
  )?;

  let words = stmt
    .query_map(params![category], |row| row_to_word(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(words)
}

pub fn get_categories(conn: &Connection) -> Result<Vec<String>> {
  let mut stmt = conn.prepare(
    "SELECT DISTINCT category FROM words WHERE category != '' ORDER BY category ASC",
  )?;

  let categories = stmt
    .query_map([], |row| row.get(0))?
    .collect::<Result<Vec<_>>>()?;
  Ok(categories)
}

pub fn count_words(conn: &Connection) -> Result<i64> {
  conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))
}

/// Convert a database row to a WordItem struct
fn row_to_word(row: &rusqlite::Row) -> Result<WordItem> {
  Ok(WordItem {
    id: row.get(0)?,
    word: row.get(1)?,
    definition_en: row.get(2)?,
    example_en: row.get(3)?,
    translation_es: row.get(4)?,
    category: row.get(5)?,
    seq: row.get(6)?,
  })
}
