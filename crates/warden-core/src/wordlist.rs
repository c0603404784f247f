use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error("'{0}' is already in the list")]
    AlreadyExists(String),

    #[error("'{0}' is not in the list")]
    NotFound(String),

    #[error("word is empty")]
    EmptyWord,

    #[error("word list i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Banned words backed by a plain text file, one word per line.
///
/// Every mutation rewrites the whole file and then reloads it, so the
/// in-memory list always reflects what is on disk.
#[derive(Debug)]
pub struct WordListStore {
    path: PathBuf,
    words: RwLock<Vec<String>>,
}

impl WordListStore {
    /// Open the store. A missing file is an empty list, not an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, WordListError> {
        let path = path.into();
        let words = read_words(&path)?;
        Ok(Self {
            path,
            words: RwLock::new(words),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a word. Returns the normalized word that was stored.
    pub async fn add(&self, word: &str) -> Result<String, WordListError> {
        let word = normalize(word).ok_or(WordListError::EmptyWord)?;

        let mut words = self.words.write().await;
        if words.contains(&word) {
            return Err(WordListError::AlreadyExists(word));
        }

        let mut next = words.clone();
        next.push(word.clone());
        *words = self.persist(&next)?;
        Ok(word)
    }

    /// Remove a word. Returns the normalized word that was removed.
    pub async fn remove(&self, word: &str) -> Result<String, WordListError> {
        let word = normalize(word).ok_or(WordListError::EmptyWord)?;

        let mut words = self.words.write().await;
        let Some(pos) = words.iter().position(|w| *w == word) else {
            return Err(WordListError::NotFound(word));
        };

        let mut next = words.clone();
        next.remove(pos);
        *words = self.persist(&next)?;
        Ok(word)
    }

    pub async fn list(&self) -> Vec<String> {
        self.words.read().await.clone()
    }

    /// Case-insensitive substring scan. No word-boundary logic: "pass" matches
    /// "password".
    pub async fn contains(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.words
            .read()
            .await
            .iter()
            .any(|w| text.contains(w.as_str()))
    }

    fn persist(&self, words: &[String]) -> Result<Vec<String>, WordListError> {
        let mut out = String::new();
        for w in words {
            out.push_str(w);
            out.push('\n');
        }

        let mut file = fs::File::create(&self.path)?;
        file.write_all(out.as_bytes())?;
        file.sync_all()?;

        Ok(read_words(&self.path)?)
    }
}

fn normalize(word: &str) -> Option<String> {
    let w = word.trim().to_lowercase();
    if w.is_empty() {
        None
    } else {
        Some(w)
    }
}

fn read_words(path: &Path) -> io::Result<Vec<String>> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut words: Vec<String> = Vec::new();
    for line in contents.lines() {
        let Some(w) = normalize(line) else {
            continue;
        };
        if !words.contains(&w) {
            words.push(w);
        }
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::tmp_path;

    #[tokio::test]
    async fn missing_file_is_empty() {
        let store = WordListStore::load(tmp_path("warden-words-missing")).unwrap();
        assert!(store.list().await.is_empty());
        assert!(!store.contains("anything").await);
    }

    #[tokio::test]
    async fn load_normalizes_and_dedupes() {
        let path = tmp_path("warden-words-load");
        fs::write(&path, "Spam\n\n  scam \nSPAM\nspam\n").unwrap();

        let store = WordListStore::load(&path).unwrap();
        assert_eq!(store.list().await, vec!["spam", "scam"]);

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn add_persists_and_rejects_duplicates() {
        let path = tmp_path("warden-words-add");
        let store = WordListStore::load(&path).unwrap();

        assert_eq!(store.add("Casino").await.unwrap(), "casino");
        assert!(store.contains("Best CASINO in town").await);
        assert_eq!(store.list().await, vec!["casino"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "casino\n");

        let err = store.add("CASINO").await.unwrap_err();
        assert!(matches!(err, WordListError::AlreadyExists(w) if w == "casino"));
        assert_eq!(store.list().await.len(), 1);

        assert!(matches!(
            store.add("   ").await.unwrap_err(),
            WordListError::EmptyWord
        ));

        // A fresh store sees the same state.
        let reopened = WordListStore::load(&path).unwrap();
        assert_eq!(reopened.list().await, vec!["casino"]);

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn remove_is_not_idempotent() {
        let path = tmp_path("warden-words-remove");
        let store = WordListStore::load(&path).unwrap();
        store.add("spam").await.unwrap();
        store.add("eggs").await.unwrap();

        assert_eq!(store.remove("SPAM").await.unwrap(), "spam");
        assert!(!store.contains("spam").await);
        assert!(matches!(
            store.remove("spam").await.unwrap_err(),
            WordListError::NotFound(_)
        ));
        assert_eq!(store.list().await, vec!["eggs"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "eggs\n");

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn removed_word_can_still_match_through_a_shorter_word() {
        let path = tmp_path("warden-words-overlap");
        let store = WordListStore::load(&path).unwrap();
        store.add("pass").await.unwrap();
        store.add("password").await.unwrap();

        store.remove("password").await.unwrap();
        assert!(store.contains("my password").await);

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn failed_write_leaves_list_untouched() {
        let dir = tmp_path("warden-words-dir");
        fs::create_dir_all(&dir).unwrap();
        // The backing "file" is a directory, so every write fails.
        let store = WordListStore {
            path: dir.clone(),
            words: RwLock::new(vec!["spam".to_string()]),
        };

        assert!(matches!(
            store.add("eggs").await.unwrap_err(),
            WordListError::Io(_)
        ));
        assert!(matches!(
            store.remove("spam").await.unwrap_err(),
            WordListError::Io(_)
        ));
        assert_eq!(store.list().await, vec!["spam"]);

        let _ = fs::remove_dir_all(&dir);
    }
}
