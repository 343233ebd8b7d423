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


//! REST and web interface for the customer registry.

use crate::driver::Driver;
use axum::Router;
use bibliotheca_authn::authz::{Access, AccessPolicy, AccessRule};
use bibliotheca_authn::rest::{AuthnState, protect};

mod create_get;
mod create_post;
mod customer_delete;
mod customer_get;
mod customers_get;
mod customers_post;
mod models;
mod root_get;
#[cfg(test)]
mod testutils;
mod web_create_post;
mod web_form_get;
mod web_post;

/// State shared by all handlers of the registry.
///
/// The authentication state is needed by the pages that embed the CSRF token in their forms.
type AppState = (Driver, AuthnState);

/// Builds the table that maps routes to the callers that may access them.
pub(crate) fn access_policy() -> AccessPolicy {
    AccessPolicy::new(vec![
        AccessRule::any(&["/login", "/logout", "/csrf"], Access::Public),
        AccessRule::any(&["/**"], Access::Authenticated),
    ])
}

/// Creates the router for the application.
///
/// All routes go through the authentication guard configured in `authn`, which must have been
/// created with the table returned by `access_policy`.
pub(crate) fn app(driver: Driver, authn: AuthnState) -> Router {
    use axum::routing::{get, post};

    let app = Router::new()
        .route("/", get(root_get::handler))
        .route("/api", get(customers_get::handler).post(customers_post::handler))
        .route("/api/create", get(create_get::handler).post(create_post::handler))
        .route("/api/:id", get(customer_get::handler).delete(customer_delete::handler))
        .route("/web", post(web_post::handler))
        .route("/web/form", get(web_form_get::handler))
        .route("/web/create", post(web_create_post::handler))
        .with_state((driver, authn.clone()));
    protect(app, authn)
}
