//! JSON-backed game data: the read-only trap catalogue and the persistent
//! high-score board. Both live as plain arrays on disk.

pub mod items;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TRAPS_PATH: &str = "data/traps.json";
pub const HIGH_SCORES_PATH: &str = "data/highscores.json";

/// The board never holds more entries than this after an update.
pub const SCORE_TABLE_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One hazard type's parameters. Loaded once at startup, never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrapSpec {
    pub name: String,
    pub glyph: char,
    pub damage: i32,
}

/// Reads the trap catalogue. A missing or malformed file is fatal; there is
/// no fallback content for traps.
pub fn load_traps<P: AsRef<Path>>(path: P) -> Result<Vec<TrapSpec>, DataError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DataError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HighScore {
    pub name: String,
    pub score: i64,
    pub depth: u32,
    pub recorded_at: String,
}

impl HighScore {
    pub fn new(name: &str, score: i64, depth: u32) -> Self {
        Self {
            name: name.to_string(),
            score,
            depth,
            recorded_at: Utc::now().to_rfc3339(),
        }
    }
}

/// The persistent top-ten list. Loaded once at startup; every submission
/// appends, re-sorts, truncates, and overwrites the backing file.
pub struct ScoreBoard {
    path: PathBuf,
    entries: Vec<HighScore>,
}

impl ScoreBoard {
    /// A missing or empty file loads as an empty board; malformed content is
    /// an error the caller should treat as fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| DataError::Parse {
                path: path.display().to_string(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(DataError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        Ok(Self { path, entries })
    }

    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    pub fn submit(&mut self, entry: HighScore) -> Result<(), DataError> {
        self.entries = rank(std::mem::take(&mut self.entries), entry);
        let text = serde_json::to_string(&self.entries).map_err(|source| DataError::Parse {
            path: self.path.display().to_string(),
            source,
        })?;
        fs::write(&self.path, text).map_err(|source| DataError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// Append, sort by score descending, keep the top ten.
fn rank(mut entries: Vec<HighScore>, entry: HighScore) -> Vec<HighScore> {
    entries.push(entry);
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(SCORE_TABLE_LIMIT);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(value: i64) -> HighScore {
        HighScore::new("tester", value, 1)
    }

    #[test]
    fn rank_sorts_descending() {
        let board = rank(vec![score(50), score(80), score(30)], score(60));
        let values: Vec<i64> = board.iter().map(|entry| entry.score).collect();
        assert_eq!(values, vec![80, 60, 50, 30]);
    }

    #[test]
    fn rank_drops_the_lowest_past_ten() {
        let existing: Vec<HighScore> = (1..=10).map(|n| score(n * 10)).collect();
        let board = rank(existing, score(85));
        assert_eq!(board.len(), SCORE_TABLE_LIMIT);
        assert_eq!(board[0].score, 100);
        assert!(board.iter().all(|entry| entry.score != 10));
    }

    #[test]
    fn missing_file_loads_as_empty_board() {
        let path = std::env::temp_dir().join("gloomdelve-no-such-scores.json");
        let _ = fs::remove_file(&path);
        let board = ScoreBoard::load(&path).expect("missing file is not an error");
        assert!(board.entries().is_empty());
    }

    #[test]
    fn submit_persists_and_reloads() {
        let path = std::env::temp_dir().join(format!(
            "gloomdelve-scores-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let mut board = ScoreBoard::load(&path).unwrap();
        board.submit(score(120)).unwrap();
        board.submit(score(240)).unwrap();

        let reloaded = ScoreBoard::load(&path).unwrap();
        let values: Vec<i64> = reloaded.entries().iter().map(|entry| entry.score).collect();
        assert_eq!(values, vec![240, 120]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_board_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "gloomdelve-bad-scores-{}.json",
            std::process::id()
        ));
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            ScoreBoard::load(&path),
            Err(DataError::Parse { .. })
        ));
        let _ = fs::remove_file(&path);
    }
}
