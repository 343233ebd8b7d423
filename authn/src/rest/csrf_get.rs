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

//! API to obtain the CSRF token of the current session.

use crate::rest::{
    AuthnState, CSRF_HEADER_NAME, CSRF_PARAMETER_NAME, SessionContext, ensure_session,
};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use bibliotheca_core::rest::{EmptyBody, RestResult};
use serde::{Deserialize, Serialize};

/// Message returned by the server with the CSRF token to use in modifying requests.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfResponse {
    /// The token itself.
    pub token: String,

    /// Name of the header in which to send the token.
    pub header_name: String,

    /// Name of the form field in which to send the token.
    pub parameter_name: String,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(state): State<AuthnState>,
    context: SessionContext,
    headers: HeaderMap,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let (token, response_headers) = ensure_session(state.driver, context, &headers).await?;

    let response = CsrfResponse {
        token: token.as_str().to_owned(),
        header_name: CSRF_HEADER_NAME.to_owned(),
        parameter_name: CSRF_PARAMETER_NAME.to_owned(),
    };
    Ok((response_headers, Json(response)))
}
