pub mod progress;
pub mod reviews;
pub mod schema;
pub mod stats;
pub mod words;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, Result};

use crate::domain::WordItem;

// Re-export all public items from submodules
pub use progress::*;
pub use reviews::*;
pub use schema::run_migrations;
pub use stats::*;
pub use words::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
  /// Log the error at warn level and return the default
  fn log_warn_default(self, context: &str) -> T
  where
    T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }

  fn log_warn_default(self, context: &str) -> T
  where
    T: Default,
  {
    match self {
      Ok(v) => v,
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        T::default()
      }
    }
  }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Database unavailable")
  }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// Seed a small starter catalog so the trainer is usable before the first
/// real word list is imported. No-op once any words exist.
pub fn seed_demo_words(conn: &Connection) -> Result<()> {
  if words::count_words(conn)? > 0 {
    return Ok(());
  }

  for (seq, w) in demo_words().into_iter().enumerate() {
    let mut w = w;
    w.seq = Some(seq as i64 + 1);
    words::upsert_word(conn, &w)?;
  }
  Ok(())
}

// Helper to build a seed entry with example and translation
fn entry(word: &str, def: &str, example: &str, es: &str, category: &str) -> WordItem {
  let mut w = WordItem::new(word.to_string(), def.to_string(), category.to_string());
  w.example_en = Some(example.to_string());
  w.translation_es = Some(es.to_string());
  w
}

fn demo_words() -> Vec<WordItem> {
  vec![
    entry(
      "give up",
      "to stop trying to do something",
      "Don't give up now, you are almost there.",
      "rendirse",
      "Idiom",
    ),
    entry(
      "hinge",
      "a movable joint that fastens a door to its frame",
      "The gate swung on a rusty hinge.",
      "bisagra",
      "Noun",
    ),
    entry(
      "faint",
      "very slight or weak; hard to perceive",
      "She heard a faint echo in the cave.",
      "tenue",
      "Adjective",
    ),
    entry(
      "run errands",
      "to go out to buy or do small everyday things",
      "I spent the morning running errands downtown.",
      "hacer recados",
      "Idiom",
    ),
    entry(
      "gather",
      "to bring together or collect from different places",
      "We gathered wood for the fire.",
      "recoger",
      "Verb",
    ),
    entry(
      "stubborn",
      "refusing to change one's mind or behavior",
      "He is too stubborn to ask for directions.",
      "terco",
      "Adjective",
    ),
    entry(
      "threshold",
      "the floor of a doorway; the point at which something begins",
      "She paused at the threshold before entering.",
      "umbral",
      "Noun",
    ),
    entry(
      "look forward to",
      "to feel pleased about something that is going to happen",
      "I look forward to hearing from you.",
      "tener ganas de",
      "Idiom",
    ),
    entry(
      "wander",
      "to walk around slowly with no clear direction",
      "We wandered through the old town all afternoon.",
      "vagar",
      "Verb",
    ),
    entry(
      "reluctant",
      "unwilling and hesitant to do something",
      "He was reluctant to lend his car.",
      "reacio",
      "Adjective",
    ),
    entry(
      "make ends meet",
      "to earn just enough money to live on",
      "With two jobs she barely makes ends meet.",
      "llegar a fin de mes",
      "Idiom",
    ),
    entry(
      "ledger",
      "a book in which financial accounts are recorded",
      "Every sale was written down in the ledger.",
      "libro mayor",
      "Noun",
    ),
  ]
}
