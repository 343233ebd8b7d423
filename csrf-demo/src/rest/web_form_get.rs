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


//! Page with a form to register a customer.

use crate::rest::AppState;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use bibliotheca_authn::rest::SessionContext;
use bibliotheca_core::rest::{EmptyBody, RestResult};
use bibliotheca_core::template;
use http::HeaderMap;

/// HTML of the customer form.
const FORM_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><title>New customer</title></head>

<body>
<form method="post" action="/web/create">
<h2>New customer</h2>
<p><label for="firstName">First name</label>
<input type="text" id="firstName" name="firstName" maxlength="100" required autofocus></p>
<p><label for="lastName">Last name</label>
<input type="text" id="lastName" name="lastName" maxlength="100" required></p>
<input name="_csrf" type="hidden" value="%csrf%">
<button type="submit">Create</button>
</form>
<p><a href="/">Back to the list</a></p>
</body>
</html>
"#;

/// GET handler for this API.
pub(crate) async fn handler(
    State((_driver, authn)): State<AppState>,
    context: SessionContext,
    headers: HeaderMap,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let (token, response_headers) = authn.form_token(context, &headers).await?;
    let body = template::apply_html(FORM_TEMPLATE, &[("csrf", token.as_str())]);
    Ok((response_headers, Html(body)))
}
