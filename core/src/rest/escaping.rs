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

//! Encoders to neutralize user-controlled strings before echoing them back.
//!
//! Values go through two fixed stages: first they are encoded for inclusion in HTML text and
//! attribute contexts, and then the result is encoded for inclusion in JavaScript string
//! literals.  The combination is safe to embed in either context.

/// Encodes `input` for safe inclusion in HTML text or a quoted attribute.
///
/// Control characters that have no business in HTML (everything in C0 other than tab, line feed
/// and carriage return, plus DEL and the C1 block) are replaced by a space.
pub fn for_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&#34;"),
            '\'' => output.push_str("&#39;"),
            '\t' | '\n' | '\r' => output.push(ch),
            '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}' => output.push(' '),
            ch => output.push(ch),
        }
    }
    output
}

/// Encodes `input` for safe inclusion in a JavaScript string literal, quoted with either single
/// or double quotes.
pub fn for_javascript(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\u{8}' => output.push_str("\\b"),
            '\t' => output.push_str("\\t"),
            '\n' => output.push_str("\\n"),
            '\u{c}' => output.push_str("\\f"),
            '\r' => output.push_str("\\r"),
            '\u{0}'..='\u{1f}' => output.push_str(&format!("\\x{:02x}", u32::from(ch))),
            '"' => output.push_str("\\x22"),
            '\'' => output.push_str("\\x27"),
            '&' => output.push_str("\\x26"),
            '\\' => output.push_str("\\\\"),
            '/' => output.push_str("\\/"),
            '-' => output.push_str("\\-"),
            '\u{2028}' => output.push_str("\\u2028"),
            '\u{2029}' => output.push_str("\\u2029"),
            ch => output.push(ch),
        }
    }
    output
}

/// Applies both encoding stages to `input`: HTML first, then JavaScript.
pub fn sanitize(input: &str) -> String {
    for_javascript(&for_html(input))
}

/// Applies `sanitize` to every element of `values`, keeping their order.
pub fn sanitize_all<'a, I: IntoIterator<Item = &'a String>>(values: I) -> Vec<String> {
    values.into_iter().map(|v| sanitize(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_strings_are_unchanged() {
        for s in ["", "Clean Code", "bruce.wayne@example.com", "9780132350884", "a_b c.d@e"] {
            assert_eq!(s, sanitize(s));
        }
        assert_eq!("M\u{00fc}ller \u{00e9}t\u{00e9}", sanitize("M\u{00fc}ller \u{00e9}t\u{00e9}"));
    }

    #[test]
    fn test_for_html() {
        assert_eq!("&lt;b&gt;&amp;&#34;&#39;", for_html("<b>&\"'"));
        assert_eq!("a\tb\nc\rd", for_html("a\tb\nc\rd"));
        assert_eq!("a b c d", for_html("a\u{0}b\u{7f}c\u{85}d"));
    }

    #[test]
    fn test_for_javascript() {
        assert_eq!("\\b\\t\\n\\f\\r", for_javascript("\u{8}\t\n\u{c}\r"));
        assert_eq!("\\x00\\x1b", for_javascript("\u{0}\u{1b}"));
        assert_eq!("\\x22\\x27\\x26", for_javascript("\"'&"));
        assert_eq!("\\\\\\/\\-", for_javascript("\\/-"));
        assert_eq!("\\u2028\\u2029", for_javascript("\u{2028}\u{2029}"));
    }

    #[test]
    fn test_sanitize_script_payload() {
        assert_eq!(
            "\\x26lt;script\\x26gt;alert(1)\\x26lt;\\/script\\x26gt;",
            sanitize("<script>alert(1)</script>")
        );
        assert!(!sanitize("<img src=x onerror='a()'>").contains('<'));
        assert!(!sanitize("\"quoted\"").contains('"'));
    }

    #[test]
    fn test_sanitize_order_matters() {
        // The HTML stage emits '&', which the JavaScript stage then encodes.
        assert_eq!("\\x26amp;", sanitize("&"));
        assert_eq!("\\x26#39;", sanitize("'"));
    }

    #[test]
    fn test_sanitize_all() {
        let values = vec!["a".to_owned(), "<b>".to_owned()];
        assert_eq!(vec!["a".to_owned(), "\\x26lt;b\\x26gt;".to_owned()], sanitize_all(&values));
    }
}
