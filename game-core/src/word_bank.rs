use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

const DEFAULT_WORDS: &str = include_str!("../words/default.txt");

/// Pool of candidate board words
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Parse a newline separated word list. Blank lines and `#` comments are skipped,
    /// words are trimmed, upper-cased and deduplicated.
    pub fn new(word_list: &str) -> Self {
        let words: BTreeSet<String> = word_list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_uppercase)
            .collect();

        Self {
            words: words.into_iter().collect(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;
        Ok(Self::new(&contents))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        let word = word.trim().to_uppercase();
        self.words.binary_search(&word).is_ok()
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS)
    }
}
