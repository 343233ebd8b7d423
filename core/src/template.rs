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

//! Trivial templating engine for the HTML pages served by the apps.

use crate::rest::escaping;

/// Performs various named string replacements in `input` based on `replacements`.
///
/// The `input` string can have `%key%` strings in it where `key` must appear in `replacements` and
/// which will be replaced by its corresponding value.  Raw `%` characters can be escaped via `%%`
/// and nested expansions are not supported.  Values are inserted verbatim.
pub fn apply(input: &'static str, replacements: &[(&'static str, &str)]) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('%') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('%').unwrap_or_else(|| panic!("Unterminated key in template"));
        let key = &after[..end];
        if key.is_empty() {
            output.push('%');
        } else {
            let mut values = replacements.iter().filter(|(k, _)| *k == key);
            let value = values.next().unwrap_or_else(|| {
                panic!("No replacement for {} but it must have been defined", key)
            });
            assert!(values.next().is_none(), "Found two values for replacement {}", key);
            output.push_str(value.1);
        }
        rest = &after[end + 1..];
    }
    output.push_str(rest);
    output
}

/// Same as `apply` but encodes every replacement value for HTML before inserting it.
pub fn apply_html(input: &'static str, replacements: &[(&'static str, &str)]) -> String {
    let escaped = replacements
        .iter()
        .map(|(key, value)| (*key, escaping::for_html(value)))
        .collect::<Vec<(&'static str, String)>>();
    let refs = escaped.iter().map(|(key, value)| (*key, value.as_str())).collect::<Vec<_>>();
    apply(input, &refs)
}
