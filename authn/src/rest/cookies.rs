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

//! The `JSESSIONID` session cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use http::HeaderMap;
use http::header;
use regex::Regex;
use std::sync::LazyLock;

/// Name of the cookie that carries the session identifier.
pub const SESSION_COOKIE: &str = "JSESSIONID";

/// Pattern to derive the cookie domain from the request host, capturing the last two labels.
static DOMAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+?\.(\w+\.[a-z]+)$").unwrap());

/// Returns the value of the session cookie sent by the client, if any.
pub fn get_session_cookie(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers).get(SESSION_COOKIE).map(|c| c.value().to_owned())
}

/// Extracts the host name, without port, that the client used to reach us.
fn request_host(headers: &HeaderMap) -> Option<&str> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    if host.starts_with('[') {
        return None;
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|ch| ch.is_ascii_digit()) => Some(name),
        _ => Some(host),
    }
}

/// Computes the domain to scope the session cookie to.
///
/// Returns `None` when the host does not look like a subdomain, in which case the cookie is only
/// sent back to the host that set it.
fn cookie_domain(headers: &HeaderMap) -> Option<String> {
    let host = request_host(headers)?;
    DOMAIN_REGEX.captures(host).and_then(|c| c.get(1)).map(|m| m.as_str().to_owned())
}

/// Builds the session cookie with `value` for a response to a request with `headers`.
pub fn make_session_cookie(value: String, headers: &HeaderMap, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure);
    if let Some(domain) = cookie_domain(headers) {
        builder = builder.domain(domain);
    }
    builder.build()
}

/// Builds a cookie that instructs the client to forget its session cookie.
pub fn make_session_removal(headers: &HeaderMap, secure: bool) -> Cookie<'static> {
    let mut cookie = make_session_cookie(String::new(), headers, secure);
    cookie.make_removal();
    cookie
}
