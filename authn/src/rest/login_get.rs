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

//! API to render the login form.

use crate::rest::{AuthnState, SessionContext, ensure_session};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse};
use bibliotheca_core::rest::{EmptyBody, RestResult};
use bibliotheca_core::template;
use serde::{Deserialize, Serialize};

/// HTML of the login form.
const LOGIN_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Please sign in</title></head>

<body>
<form method="post" action="/login">
<h2>Please sign in</h2>
<p class="message">%message%</p>
<p><label for="username">Username</label>
<input type="text" id="username" name="username" required autofocus></p>
<p><label for="password">Password</label>
<input type="password" id="password" name="password" required></p>
<input name="_csrf" type="hidden" value="%csrf%">
<button type="submit">Sign in</button>
</form>
</body>
</html>
"#;

/// Flags that previous steps of the login flow leave in the query string.
#[derive(Default, Deserialize, Serialize)]
pub struct LoginQuery {
    /// Present after a failed login attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Present after a logout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout: Option<String>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(state): State<AuthnState>,
    context: SessionContext,
    Query(query): Query<LoginQuery>,
    headers: HeaderMap,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let (token, response_headers) = ensure_session(state.driver, context, &headers).await?;

    let message = if query.error.is_some() {
        "Bad credentials"
    } else if query.logout.is_some() {
        "You have been signed out"
    } else {
        ""
    };
    let body =
        template::apply_html(LOGIN_TEMPLATE, &[("message", message), ("csrf", token.as_str())]);

    Ok((response_headers, Html(body)))
}
