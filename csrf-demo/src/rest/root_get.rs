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


//! Page that lists all customers.

use crate::rest::AppState;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use bibliotheca_authn::rest::SessionContext;
use bibliotheca_core::rest::escaping;
use bibliotheca_core::rest::{EmptyBody, RestResult};
use bibliotheca_core::template;
use http::HeaderMap;

/// HTML of the index page.
const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Customers</title></head>

<body>
<h1>Customers</h1>
<ul>
%customers%</ul>
<p><a href="/web/form">Add a customer</a></p>
<form method="post" action="/logout">
<input name="_csrf" type="hidden" value="%csrf%">
<button type="submit">Sign out</button>
</form>
</body>
</html>
"#;

/// HTML of one entry in the list of customers.
const CUSTOMER_TEMPLATE: &str = "<li>%first_name% %last_name%</li>\n";

/// GET handler for this API.
pub(crate) async fn handler(
    State((driver, authn)): State<AppState>,
    context: SessionContext,
    headers: HeaderMap,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let (token, response_headers) = authn.form_token(context, &headers).await?;

    let customers = driver.get_customers().await?;
    let mut items = String::new();
    for customer in customers {
        items.push_str(&template::apply_html(
            CUSTOMER_TEMPLATE,
            &[
                ("first_name", customer.first_name().as_str()),
                ("last_name", customer.last_name().as_str()),
            ],
        ));
    }

    let csrf = escaping::for_html(token.as_str());
    let body =
        template::apply(INDEX_TEMPLATE, &[("customers", items.as_str()), ("csrf", csrf.as_str())]);
    Ok((response_headers, Html(body)))
}
