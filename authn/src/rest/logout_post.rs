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

//! API to terminate a session.

use crate::rest::cookies::make_session_removal;
use crate::rest::{AuthnState, SessionContext, cookie_header, redirect};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use bibliotheca_core::rest::RestResult;
use http::header;

/// POST handler for this API.
///
/// The body is not inspected because it usually carries the form with the CSRF token, which has
/// already been validated.
pub(crate) async fn handler(
    State(state): State<AuthnState>,
    context: SessionContext,
    headers: HeaderMap,
) -> RestResult<impl IntoResponse> {
    let secure = state.driver.opts().cookie_secure;
    if let Some(session) = context.session {
        state.driver.logout_session(session).await?;
    }

    let mut response_headers = HeaderMap::new();
    response_headers
        .insert(header::SET_COOKIE, cookie_header(make_session_removal(&headers, secure))?);
    Ok(redirect("/login?logout", response_headers))
}
