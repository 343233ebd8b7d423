// Bibliotheca
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Dictionary of common passwords that the password policy rejects.

use bibliotheca_core::env::get_optional_var;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

/// Word list bundled with the binary: the top-100 most common leaked passwords.
const BUNDLED_LIST: &str = include_str!("password-list.txt");

/// Words to use when the configured list cannot be loaded.
const FALLBACK_WORDS: &[&str] =
    &["password", "Password", "123456", "12345678", "admin", "geheim", "secret"];

/// An immutable list of words, sorted case-insensitively.
#[derive(Debug)]
pub struct WordList {
    /// The words in the list, in the order in which they are checked.
    words: Vec<String>,
}

impl WordList {
    /// Creates a word list from raw `words`, trimming them and skipping blank entries.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_owned())
            .filter(|w| !w.is_empty())
            .collect::<Vec<String>>();
        words.sort_by_cached_key(|w| w.to_lowercase());
        Self { words }
    }

    /// Parses a word list with one word per line.
    fn parse(contents: &str) -> Self {
        Self::new(contents.lines())
    }

    /// Returns the word list bundled with the binary.
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_LIST)
    }

    /// Returns the minimal word list used when nothing else is available.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_WORDS)
    }

    /// Loads a word list from the file at `path`.
    pub fn load(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    /// Loads the word list named by the `<prefix>_PASSWORD_LIST` variable, or the bundled one if
    /// the variable is not set.
    ///
    /// Never fails: any problem loading the configured list is logged and results in the fallback
    /// list instead.
    pub fn from_env(prefix: &str) -> Arc<Self> {
        let path = match get_optional_var::<PathBuf>(prefix, "PASSWORD_LIST") {
            Ok(path) => path,
            Err(e) => {
                warn!("Error loading the password list: {}", e);
                return Arc::from(Self::fallback());
            }
        };

        let list = match path {
            None => {
                let list = Self::bundled();
                info!("Successfully loaded the bundled password list with size {}", list.len());
                list
            }
            Some(path) => match Self::load(&path) {
                Ok(list) => {
                    info!(
                        "Successfully loaded the password list from {} with size {}",
                        path.display(),
                        list.len()
                    );
                    list
                }
                Err(e) => {
                    warn!("Error loading the password list: {}: {}", path.display(), e);
                    Self::fallback()
                }
            },
        };
        Arc::from(list)
    }

    /// Returns the number of words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the list has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the first word in the list that appears in `text`, ignoring case.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        self.words.iter().find(|w| text.contains(&w.to_lowercase())).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_sorts_and_trims() {
        let list = WordList::new(["zebra", "  Apple ", "", "banana", "   "]);
        assert_eq!(3, list.len());
        assert_eq!(vec!["Apple", "banana", "zebra"], list.words);
    }

    #[test]
    fn test_bundled() {
        let list = WordList::bundled();
        assert_eq!(100, list.len());
        assert_eq!(Some("qwerty"), list.find_in("qwertyuser"));
    }

    #[test]
    fn test_fallback() {
        let list = WordList::fallback();
        assert_eq!(7, list.len());
        assert_eq!(Some("geheim"), list.find_in("xGEHEIMx"));
    }

    #[test]
    fn test_find_in_first_in_sorted_order() {
        let list = WordList::new(["monkey", "key", "Monk"]);
        assert_eq!(Some("key"), list.find_in("MONKEY"));
        assert_eq!(None, list.find_in("donkee"));
    }

    #[test]
    fn test_from_env_default_is_bundled() {
        temp_env::with_var("WORDS_PASSWORD_LIST", None::<&str>, || {
            assert_eq!(100, WordList::from_env("WORDS").len());
        });
    }

    #[test]
    fn test_from_env_custom_file() {
        let path = std::env::temp_dir().join(format!("wordlist-{}.txt", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            writeln!(file, "first\n\n  second  \nthird").unwrap();
        }
        temp_env::with_var("WORDS_PASSWORD_LIST", Some(path.as_os_str()), || {
            let list = WordList::from_env("WORDS");
            assert_eq!(3, list.len());
            assert_eq!(Some("second"), list.find_in("my second try"));
        });
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_env_missing_file_falls_back() {
        temp_env::with_var("WORDS_PASSWORD_LIST", Some("/nonexistent/password-list.txt"), || {
            let list = WordList::from_env("WORDS");
            assert_eq!(7, list.len());
        });
    }
}
