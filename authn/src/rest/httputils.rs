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

//! Utilities to deal with HTTP authorization.

use crate::model::Password;
use base64::Engine;
use base64::engine::general_purpose;
use bibliotheca_core::model::Username;
use bibliotheca_core::rest::{RestError, RestResult, get_unique_header};
use http::header::{self, HeaderMap};

/// Builds the error returned to clients that sent unusable basic credentials.
fn unauthorized<S: Into<String>>(realm: &'static str, message: S) -> RestError {
    RestError::Unauthorized { scheme: "Basic", realm, message: message.into() }
}

/// Checks if the request carries an `Authorization` header of any kind.
pub fn has_authorization(headers: &HeaderMap) -> bool {
    headers.contains_key(header::AUTHORIZATION)
}

/// Assumes that the `headers` contain basic authentication credentials and extracts them.
pub fn get_basic_auth(
    headers: &HeaderMap,
    exp_realm: &'static str,
) -> RestResult<(Username, Password)> {
    let authz = match get_unique_header(headers, &header::AUTHORIZATION) {
        Ok(Some(value)) => value,
        Ok(None) => return Err(unauthorized(exp_realm, "Missing Authorization header")),
        Err(e) => return Err(unauthorized(exp_realm, e.to_string())),
    };
    let authz = authz.to_str().map_err(|e| {
        unauthorized(exp_realm, format!("Bad encoding in Authorization header: {}", e))
    })?;

    let payload = match authz.split_once(' ') {
        Some(("Basic", payload)) => payload,
        Some((_, _)) => return Err(unauthorized(exp_realm, "Unsupported scheme")),
        None if authz.is_empty() => {
            return Err(unauthorized(exp_realm, "Bad Authorization header: missing scheme"));
        }
        None => return Err(unauthorized(exp_realm, "Bad Authorization header: missing payload")),
    };

    let payload = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| unauthorized(exp_realm, format!("Bad base64 encoding in payload: {}", e)))?;

    // Both the username and the password have to be strings, so it is easier to convert the
    // payload first in one go instead of doing two conversion after splitting the bytes.
    let payload = String::from_utf8(payload)
        .map_err(|e| unauthorized(exp_realm, format!("Bad UTF-8 encoding in payload: {}", e)))?;

    let Some((username, password)) = payload.split_once(':') else {
        return Err(unauthorized(exp_realm, "Bad content"));
    };

    let username = Username::new(username).map_err(|e| unauthorized(exp_realm, e.0))?;
    let password = Password::new(password).map_err(|e| unauthorized(exp_realm, e.0))?;
    Ok((username, password))
}
