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

//! Extends the driver with session management.
//!
//! Sessions live in memory and are identified by the value of the session cookie.  Each session
//! carries its own CSRF token and, once the user logs in, the principal of the user.

use crate::driver::AuthnDriver;
use crate::model::{CsrfToken, Principal};
use async_session::SessionStore;
pub use async_session::Session;
use bibliotheca_core::driver::{DriverError, DriverResult};
use log::debug;

/// Key in the session data that holds the logged in principal.
const PRINCIPAL_KEY: &str = "principal";

/// Key in the session data that holds the CSRF token.
const CSRF_TOKEN_KEY: &str = "csrf";

/// Converts an error from the session store into a driver error.
fn backend_error<E: std::fmt::Display>(e: E) -> DriverError {
    DriverError::BackendError(format!("Session store error: {}", e))
}

/// Returns the principal of the user logged into `session`, if any.
pub fn session_principal(session: &Session) -> Option<Principal> {
    session.get::<Principal>(PRINCIPAL_KEY)
}

/// Returns the CSRF token tied to `session`, if any.
pub fn session_csrf_token(session: &Session) -> Option<CsrfToken> {
    session.get::<String>(CSRF_TOKEN_KEY).and_then(|token| CsrfToken::new(token).ok())
}

impl AuthnDriver {
    /// Stores a brand new `session`, returning a copy of it and the value of the cookie that
    /// identifies it.
    ///
    /// Only the stored instance knows its cookie value, and the store hands it out just once.
    /// Expired sessions are purged from the store first.
    async fn store_new_session(&self, mut session: Session) -> DriverResult<(Session, String)> {
        self.sessions.cleanup().await.map_err(backend_error)?;

        session.expire_in(self.opts.session_max_age);
        let copy = session.clone();
        match self.sessions.store_session(session).await.map_err(backend_error)? {
            Some(cookie) => Ok((copy, cookie)),
            None => Err(DriverError::BackendError("New session without a cookie".to_owned())),
        }
    }

    /// Loads the session identified by `cookie`, returning `None` if it does not exist or has
    /// expired.
    pub async fn load_session(&self, cookie: &str) -> DriverResult<Option<Session>> {
        match self.sessions.load_session(cookie.to_owned()).await {
            Ok(session) => Ok(session),
            Err(e) => {
                debug!("Ignoring invalid session cookie: {}", e);
                Ok(None)
            }
        }
    }

    /// Creates a new anonymous session with a fresh CSRF token.
    ///
    /// Returns the session and the value of the cookie that identifies it.
    pub async fn new_session(&self) -> DriverResult<(Session, String)> {
        let mut session = Session::new();
        session.insert(CSRF_TOKEN_KEY, CsrfToken::generate().as_str()).map_err(backend_error)?;
        self.store_new_session(session).await
    }

    /// Extends the lifetime of `session` after it has been used.
    pub async fn touch_session(&self, mut session: Session) -> DriverResult<()> {
        session.expire_in(self.opts.session_max_age);
        self.sessions.store_session(session).await.map_err(backend_error)?;
        Ok(())
    }

    /// Logs `principal` in by replacing the `old` session, if any, with a new one.
    ///
    /// The session identifier and the CSRF token both change so that values obtained before the
    /// login cannot be reused after it.  Returns the value of the new session cookie.
    pub async fn login_session(
        self,
        old: Option<Session>,
        principal: &Principal,
    ) -> DriverResult<String> {
        if let Some(old) = old {
            self.sessions.destroy_session(old).await.map_err(backend_error)?;
        }

        let mut session = Session::new();
        session.insert(PRINCIPAL_KEY, principal).map_err(backend_error)?;
        session.insert(CSRF_TOKEN_KEY, CsrfToken::generate().as_str()).map_err(backend_error)?;
        let (_session, cookie) = self.store_new_session(session).await?;
        Ok(cookie)
    }

    /// Destroys `session`.
    pub async fn logout_session(self, session: Session) -> DriverResult<()> {
        self.sessions.destroy_session(session).await.map_err(backend_error)
    }
}
