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


//! REST interface for the library.

use crate::driver::Driver;
use axum::Router;
use bibliotheca_authn::authz::{Access, AccessPolicy, AccessRule};
use bibliotheca_authn::model::Role;
use bibliotheca_authn::rest::{AuthnState, protect};
use bibliotheca_core::rest::BaseUrls;
use http::Method;
use std::sync::Arc;

mod actuator_env_get;
mod actuator_get;
mod actuator_health_get;
mod actuator_info_get;
mod actuator_metrics_get;
mod book_borrow_post;
mod book_delete;
mod book_get;
mod book_put;
mod book_return_post;
mod books_get;
mod books_post;
mod models;
mod root_get;
#[cfg(test)]
mod testutils;
mod user_delete;
mod user_get;
mod user_put;
mod users_get;
mod users_post;

/// State shared by all handlers of the library.
type AppState = (Driver, Arc<BaseUrls>);

/// Builds the table that maps routes to the callers that may access them.
pub(crate) fn access_policy() -> AccessPolicy {
    AccessPolicy::new(vec![
        AccessRule::any(
            &["/actuator/health", "/actuator/health/**", "/actuator/info"],
            Access::Public,
        ),
        AccessRule::any(&["/actuator", "/actuator/**"], Access::Role(Role::LIBRARY_ACTUATOR)),
        AccessRule::any(
            &["/", "/favicon.ico", "/css/**", "/js/**", "/images/**", "/webjars/**"],
            Access::Public,
        ),
        AccessRule::any(&["/login", "/logout", "/csrf"], Access::Public),
        AccessRule::methods(
            &[Method::POST],
            &["/books/*/borrow/*", "/books/*/return/*"],
            Access::Role(Role::LIBRARY_USER),
        ),
        AccessRule::methods(&[Method::POST], &["/books"], Access::Role(Role::LIBRARY_CURATOR)),
        AccessRule::methods(
            &[Method::PUT, Method::DELETE],
            &["/books/*"],
            Access::Role(Role::LIBRARY_CURATOR),
        ),
        AccessRule::any(&["/users", "/users/*"], Access::Role(Role::LIBRARY_ADMIN)),
        AccessRule::any(&["/**"], Access::Authenticated),
    ])
}

/// Creates the router for the application.
///
/// All routes go through the authentication guard configured in `authn`, which must have been
/// created with the table returned by `access_policy`.
pub(crate) fn app(driver: Driver, base_urls: Arc<BaseUrls>, authn: AuthnState) -> Router {
    use axum::routing::{get, post};

    let app = Router::new()
        .route("/", get(root_get::handler))
        .route("/actuator", get(actuator_get::handler))
        .route("/actuator/env", get(actuator_env_get::handler))
        .route("/actuator/health", get(actuator_health_get::handler))
        .route("/actuator/health/:component", get(actuator_health_get::component_handler))
        .route("/actuator/info", get(actuator_info_get::handler))
        .route("/actuator/metrics", get(actuator_metrics_get::handler))
        .route("/books", get(books_get::handler).post(books_post::handler))
        .route(
            "/books/:book",
            get(book_get::handler).put(book_put::handler).delete(book_delete::handler),
        )
        .route("/books/:book/borrow/:user", post(book_borrow_post::handler))
        .route("/books/:book/return/:user", post(book_return_post::handler))
        .route("/users", get(users_get::handler).post(users_post::handler))
        .route(
            "/users/:user",
            get(user_get::handler).put(user_put::handler).delete(user_delete::handler),
        )
        .with_state((driver, base_urls));
    protect(app, authn)
}
