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

//! Password policy checks.
//!
//! A password is checked against an ordered set of rules.  Every rule that fails contributes one
//! or more messages, and all of them are reported together so that users can fix their password
//! in one go.

use crate::model::Password;
use crate::wordlist::WordList;
use bibliotheca_core::driver::DriverError;
use bibliotheca_core::model::Username;
use log::{info, warn};
use std::fmt;
use std::sync::Arc;

/// Minimum length of a password, in characters.
const MIN_LENGTH: usize = 12;

/// Maximum length of a password, in characters.
const MAX_LENGTH: usize = 64;

/// Number of character classes that a password must contain.
const REQUIRED_CLASSES: usize = 3;

/// Length of a run of identical characters that is rejected.
const REPEAT_LENGTH: usize = 4;

/// Whitespace characters that are not allowed in passwords.
const WHITESPACE: &[char] = &['\t', '\n', '\u{b}', '\u{c}', '\r', ' '];

/// Collection of messages describing why a password was rejected.
#[derive(Debug, PartialEq, thiserror::Error)]
pub struct PolicyViolations(Vec<String>);

impl PolicyViolations {
    /// Returns the individual violation messages in the order in which they were detected.
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for PolicyViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {}", self.0.join(","))
    }
}

impl From<PolicyViolations> for DriverError {
    fn from(e: PolicyViolations) -> Self {
        DriverError::InvalidInput(e.to_string())
    }
}

/// A class of characters that passwords should mix.
#[derive(Clone, Copy)]
enum CharClass {
    /// ASCII uppercase letters.
    Uppercase,

    /// ASCII lowercase letters.
    Lowercase,

    /// ASCII digits.
    Digit,

    /// Punctuation and symbols.
    Special,
}

impl CharClass {
    /// All classes, in the order in which they are reported.
    const ALL: [CharClass; 4] =
        [CharClass::Uppercase, CharClass::Lowercase, CharClass::Digit, CharClass::Special];

    /// Returns the name of the class as used in messages.
    fn name(self) -> &'static str {
        match self {
            CharClass::Uppercase => "uppercase",
            CharClass::Lowercase => "lowercase",
            CharClass::Digit => "digit",
            CharClass::Special => "special",
        }
    }

    /// Checks if `ch` belongs to this class.
    fn contains(self, ch: char) -> bool {
        match self {
            CharClass::Uppercase => ch.is_ascii_uppercase(),
            CharClass::Lowercase => ch.is_ascii_lowercase(),
            CharClass::Digit => ch.is_ascii_digit(),
            CharClass::Special => matches!(ch,
                '!'..='/' | ':'..='@' | '['..='`' | '{'..='~'
                | '\u{a1}'..='\u{bf}' | '\u{d7}' | '\u{f7}'
                | '\u{2010}'..='\u{2027}' | '\u{2030}'..='\u{205e}'
                | '\u{20a0}'..='\u{20bf}'),
        }
    }
}

/// Password policy backed by a dictionary of forbidden words.
#[derive(Clone)]
pub struct PasswordPolicy {
    /// Words that cannot appear in passwords.
    words: Arc<WordList>,
}

impl PasswordPolicy {
    /// Creates a new policy that rejects the words in `words`.
    pub fn new(words: Arc<WordList>) -> Self {
        Self { words }
    }

    /// Checks `password` chosen by `username` against all rules.
    pub fn validate(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<(), PolicyViolations> {
        let password = password.as_str();

        let mut messages = vec![];
        check_length(password, &mut messages);
        check_classes(password, &mut messages);
        check_repeats(password, &mut messages);
        check_username(username.as_str(), password, &mut messages);
        check_whitespace(password, &mut messages);
        if let Some(word) = self.words.find_in(password) {
            messages.push(format!("Password contains the dictionary word '{}'.", word));
        }

        if messages.is_empty() {
            info!("Password validated successfully");
            Ok(())
        } else {
            warn!("Password validation failed");
            for message in &messages {
                info!("{}", message);
            }
            Err(PolicyViolations(messages))
        }
    }
}

/// Checks that the length of `password` is within bounds.
fn check_length(password: &str, messages: &mut Vec<String>) {
    let length = password.chars().count();
    if length < MIN_LENGTH {
        messages.push(format!("Password must be {} or more characters in length.", MIN_LENGTH));
    } else if length > MAX_LENGTH {
        messages
            .push(format!("Password must be no more than {} characters in length.", MAX_LENGTH));
    }
}

/// Checks that `password` mixes enough character classes.
fn check_classes(password: &str, messages: &mut Vec<String>) {
    let missing = CharClass::ALL
        .into_iter()
        .filter(|class| !password.chars().any(|ch| class.contains(ch)))
        .collect::<Vec<CharClass>>();
    let matched = CharClass::ALL.len() - missing.len();
    if matched >= REQUIRED_CLASSES {
        return;
    }

    for class in missing {
        messages.push(format!("Password must contain 1 or more {} characters.", class.name()));
    }
    messages.push(format!(
        "Password matches {} of {} character rules, but {} are required.",
        matched,
        CharClass::ALL.len(),
        REQUIRED_CLASSES
    ));
}

/// Checks that `password` does not contain runs of identical characters.
fn check_repeats(password: &str, messages: &mut Vec<String>) {
    let chars = password.chars().collect::<Vec<char>>();
    let mut found: Vec<String> = vec![];
    let mut i = 0;
    while i < chars.len() {
        let mut j = i + 1;
        while j < chars.len() && chars[j] == chars[i] {
            j += 1;
        }
        for _ in 0..(j - i) / REPEAT_LENGTH {
            let chunk = chars[i].to_string().repeat(REPEAT_LENGTH);
            if !found.contains(&chunk) {
                found.push(chunk);
            }
        }
        i = j;
    }
    for chunk in found {
        messages.push(format!("Password matches the illegal pattern '{}'.", chunk));
    }
}

/// Checks that `password` does not contain the login name of its owner.
///
/// Login names that look like email addresses are also checked by their local part, as that is
/// what most people think of as their user id.
fn check_username(username: &str, password: &str, messages: &mut Vec<String>) {
    let mut candidates = vec![username];
    if let Some((local, _domain)) = username.split_once('@') {
        candidates.push(local);
    }
    if let Some(id) = candidates.into_iter().find(|id| !id.is_empty() && password.contains(id)) {
        messages.push(format!("Password contains the user id '{}'.", id));
    }
}

/// Checks that `password` has no whitespace.
fn check_whitespace(password: &str, messages: &mut Vec<String>) {
    let mut found: Vec<char> = vec![];
    for ch in password.chars().filter(|ch| WHITESPACE.contains(ch)) {
        if !found.contains(&ch) {
            found.push(ch);
        }
    }
    for ch in found {
        messages.push(format!("Password contains the illegal whitespace character '{}'.", ch));
    }
}
