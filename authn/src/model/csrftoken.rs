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

//! The `CsrfToken` data type.

use bibliotheca_core::model::{ModelError, ModelResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of our tokens, in characters.
const TOKEN_LENGTH: usize = 48;

/// An opaque type representing the anti-forgery token tied to a session.
///
/// Tokens are user-readable character sequences of a fixed size so that they can travel in form
/// fields and headers without further encoding.
#[derive(Clone, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Creates a new token from an untrusted string, typically coming from a request.
    pub fn new<S: Into<String>>(token: S) -> ModelResult<Self> {
        let token = token.into();
        if token.len() != TOKEN_LENGTH || !token.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(ModelError("Invalid CSRF token".to_owned()));
        }
        Ok(Self(token))
    }

    /// Generates a new random token.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let token = (0..TOKEN_LENGTH)
            .map(|_| {
                let i: u8 = rng.random_range(0..(10 + 26 + 26));
                if i < 10 {
                    (b'0' + i) as char
                } else if i < 10 + 26 {
                    (b'a' + (i - 10)) as char
                } else {
                    (b'A' + (i - 10 - 26)) as char
                }
            })
            .collect::<String>();
        Self(token)
    }

    /// Returns the string representation of the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks if `candidate` carries the same token as `self`.
    ///
    /// The comparison examines every byte regardless of where the first difference is.
    pub fn matches(&self, candidate: &str) -> bool {
        let a = self.0.as_bytes();
        let b = candidate.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed CSRF token")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_csrftoken_ok() {
        let raw_token = "a".repeat(TOKEN_LENGTH);
        let token = CsrfToken::new(&raw_token).unwrap();
        assert_eq!(&raw_token, token.as_str());
    }

    #[test]
    fn test_csrftoken_error() {
        CsrfToken::new("abcde").unwrap_err();
        CsrfToken::new("!".repeat(TOKEN_LENGTH)).unwrap_err();
        CsrfToken::new("b".repeat(TOKEN_LENGTH + 1)).unwrap_err();
    }

    #[test]
    fn test_csrftoken_generate_valid_and_unique() {
        let mut raw_tokens = HashSet::<String>::default();
        for _ in 0..1000 {
            let token = CsrfToken::generate();
            CsrfToken::new(token.as_str()).unwrap();
            raw_tokens.insert(token.as_str().to_owned());
        }
        assert_eq!(1000, raw_tokens.len());
    }

    #[test]
    fn test_csrftoken_matches() {
        let token = CsrfToken::generate();
        assert!(token.matches(token.as_str()));
        assert!(!token.matches(""));
        assert!(!token.matches(CsrfToken::generate().as_str()));
    }

    #[test]
    fn test_csrftoken_debug_is_scrubbed() {
        let token = CsrfToken::generate();
        assert!(!format!("{:?}", token).contains(token.as_str()));
    }
}
