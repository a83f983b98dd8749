use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use webindexer_core::IndexError;

/// Word <-> index bijection plus per-word corpus frequency, loaded from whitespace-separated
/// `word index frequency` triples. Duplicate word or index overwrites the earlier row.
pub struct Dictionary {
    word_to_index: HashMap<String, i32>,
    index_to_word: HashMap<i32, String>,
    frequency: HashMap<i32, i32>,
}

impl Dictionary {
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);

        let mut word_to_index = HashMap::new();
        let mut index_to_word = HashMap::new();
        let mut frequency = HashMap::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut parts = trimmed.split_whitespace();
            let word = parts.next().ok_or_else(|| IndexError::CorruptDictionaryLine {
                line_no,
                text: line.clone(),
            })?;
            let index: i32 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| IndexError::CorruptDictionaryLine {
                    line_no,
                    text: line.clone(),
                })?;
            let freq: i32 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| IndexError::CorruptDictionaryLine {
                    line_no,
                    text: line.clone(),
                })?;

            word_to_index.insert(word.to_string(), index);
            index_to_word.insert(index, word.to_string());
            frequency.insert(index, freq);
        }

        Ok(Dictionary {
            word_to_index,
            index_to_word,
            frequency,
        })
    }

    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        for (word, index) in &self.word_to_index {
            let freq = self.frequency.get(index).copied().unwrap_or(0);
            writeln!(file, "{word} {index} {freq}")?;
        }
        Ok(())
    }

    pub fn from_rows(rows: impl IntoIterator<Item = (String, i32, i32)>) -> Self {
        let mut word_to_index = HashMap::new();
        let mut index_to_word = HashMap::new();
        let mut frequency = HashMap::new();
        for (word, index, freq) in rows {
            word_to_index.insert(word.clone(), index);
            index_to_word.insert(index, word);
            frequency.insert(index, freq);
        }
        Dictionary {
            word_to_index,
            index_to_word,
            frequency,
        }
    }

    pub fn index_of(&self, word: &str) -> Option<i32> {
        self.word_to_index.get(word).copied()
    }

    pub fn word_of(&self, index: i32) -> Option<&str> {
        self.index_to_word.get(&index).map(|s| s.as_str())
    }

    pub fn frequency_of(&self, index: i32) -> Option<i32> {
        self.frequency.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.word_to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_to_index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_load_round_trips_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary");
        let dict = Dictionary::from_rows(vec![
            ("foo".to_string(), 1, 2),
            ("bar".to_string(), 2, 3),
        ]);
        dict.write(&path).unwrap();
        let loaded = Dictionary::load(&path).unwrap();
        assert_eq!(loaded.index_of("foo"), Some(1));
        assert_eq!(loaded.word_of(2), Some("bar"));
        assert_eq!(loaded.frequency_of(1), Some(2));
    }

    #[test]
    fn duplicate_word_or_index_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary");
        fs::write(&path, "foo 1 2\nfoo 1 5\n").unwrap();
        let dict = Dictionary::load(&path).unwrap();
        assert_eq!(dict.frequency_of(1), Some(5));
        assert_eq!(dict.len(), 1);
    }
}
