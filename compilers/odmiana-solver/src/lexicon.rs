use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Separator between a phrase and its precomputed result in lexicon files.
pub const LEXICON_SEPARATOR: &str = " --- ";

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lexicon line {line}: expected `phrase{sep}result`, got {content:?}", sep = LEXICON_SEPARATOR)]
    Malformed { line: usize, content: String },
}

/// Precomputed phrase -> result pairs. Lookup is exact and case-sensitive.
#[derive(Debug, Default, Clone)]
pub struct Lexicon {
    entries: HashMap<String, String>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let text = fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// One `phrase --- result` pair per line; blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, LexiconError> {
        let mut lexicon = Self::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split(LEXICON_SEPARATOR);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(phrase), Some(result), None) => {
                    lexicon.insert(phrase.to_string(), result.to_string());
                }
                _ => {
                    return Err(LexiconError::Malformed {
                        line: i + 1,
                        content: line.to_string(),
                    })
                }
            }
        }
        Ok(lexicon)
    }

    /// Later entries replace earlier ones.
    pub fn insert(&mut self, phrase: String, result: String) -> Option<String> {
        self.entries.insert(phrase, result)
    }

    pub fn get(&self, phrase: &str) -> Option<&str> {
        self.entries.get(phrase).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for Lexicon {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse() {
        let lexicon = Lexicon::parse("Nowym Jorku --- Nowy Jork\n\n  Stanach Zjednoczonych --- Stany Zjednoczone  \n")
            .expect("valid lexicon");

        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.get("Nowym Jorku"), Some("Nowy Jork"));
        assert_eq!(lexicon.get("Stanach Zjednoczonych"), Some("Stany Zjednoczone"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let lexicon = Lexicon::parse("Nowym Jorku --- Nowy Jork").unwrap();
        assert_eq!(lexicon.get("nowym jorku"), None);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let err = Lexicon::parse("a --- b\nbez separatora\n").unwrap_err();
        match err {
            LexiconError::Malformed { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "bez separatora");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            Lexicon::parse("a --- b --- c"),
            Err(LexiconError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Krakowie --- Kraków").unwrap();

        let lexicon = Lexicon::load(file.path()).unwrap();
        assert_eq!(lexicon.get("Krakowie"), Some("Kraków"));

        assert!(matches!(
            Lexicon::load(Path::new("/nonexistent/lexicon.txt")),
            Err(LexiconError::Io { .. })
        ));
    }
}
