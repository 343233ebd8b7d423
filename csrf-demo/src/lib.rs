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


//! Customer registry that demonstrates how CSRF protection guards state-changing requests.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use bibliotheca_authn::driver::{AuthnDriver, AuthnOptions};
use bibliotheca_authn::model::Password;
use bibliotheca_authn::rest::AuthnState;
use bibliotheca_core::db::Db;
use bibliotheca_core::db::sqlite;
use bibliotheca_core::env::get_optional_var;
use bibliotheca_core::rest::DEFAULT_REALM;
use log::info;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use uuid::Uuid;

mod db;
mod driver;
use driver::{Driver, single_account_store};
mod model;
mod rest;

/// Prefix of the environment variables that configure the service.
pub const ENV_PREFIX: &str = "CSRF_DEMO";

/// Default address to listen on.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Default login name of the only account.
const DEFAULT_USERNAME: &str = "user";

/// Configuration of the service.
pub struct Config {
    /// Address to listen on.
    bind_addr: SocketAddr,

    /// Login name of the only account.
    username: String,

    /// Password of the only account.  A random one is generated at startup if missing.
    password: Option<String>,

    /// Options for the authentication layer.
    authn: AuthnOptions,
}

impl Config {
    /// Reads the configuration from the `<prefix>_*` environment variables.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let bind_addr = match get_optional_var::<SocketAddr>(prefix, "BIND_ADDR")? {
            Some(addr) => addr,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|e| format!("Invalid default bind address: {}", e))?,
        };

        Ok(Self {
            bind_addr,
            username: get_optional_var::<String>(prefix, "USERNAME")?
                .unwrap_or_else(|| DEFAULT_USERNAME.to_owned()),
            password: get_optional_var::<String>(prefix, "PASSWORD")?,
            authn: AuthnOptions::from_env(prefix)?,
        })
    }
}

/// Instantiates all resources to serve the application as described by `config`.
///
/// Customers live in an in-memory database so every start sees the same sample data.
pub async fn serve(config: Config) -> Result<(), Box<dyn Error>> {
    let db: Arc<dyn Db + Send + Sync> = Arc::new(sqlite::connect(":memory:").await?);
    db::init_schema(&mut db.ex().await?).await?;

    let driver = Driver::new(db);
    driver.clone().seed().await?;

    let password = match config.password {
        Some(password) => password,
        None => {
            let password = Uuid::new_v4().to_string();
            info!("Using generated security password: {}", password);
            password
        }
    };
    let store =
        single_account_store(&config.username, Password::new(password)?, config.authn.bcrypt_cost)
            .await?;
    let authn = AuthnState::new(
        AuthnDriver::new(Arc::new(store), DEFAULT_REALM, config.authn),
        rest::access_policy(),
    );
    let app = rest::app(driver, authn);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_defaults() {
        let overrides = [
            "CFGTEST_BIND_ADDR",
            "CFGTEST_USERNAME",
            "CFGTEST_PASSWORD",
            "CFGTEST_SESSION_COOKIE_SECURE",
        ];
        temp_env::with_vars_unset(overrides, || {
            let config = Config::from_env("CFGTEST").unwrap();
            assert_eq!(SocketAddr::from(([127, 0, 0, 1], 8080)), config.bind_addr);
            assert_eq!("user", config.username);
            assert!(config.password.is_none());
            assert!(!config.authn.cookie_secure);
        });
    }

    #[test]
    fn test_config_from_env_overrides() {
        let overrides = [
            ("CFGTEST_BIND_ADDR", Some("0.0.0.0:8000")),
            ("CFGTEST_USERNAME", Some("demo")),
            ("CFGTEST_PASSWORD", Some("the-password")),
            ("CFGTEST_SESSION_COOKIE_SECURE", Some("true")),
        ];
        temp_env::with_vars(overrides, || {
            let config = Config::from_env("CFGTEST").unwrap();
            assert_eq!(SocketAddr::from(([0, 0, 0, 0], 8000)), config.bind_addr);
            assert_eq!("demo", config.username);
            assert_eq!(Some("the-password".to_owned()), config.password);
            assert!(config.authn.cookie_secure);
        });
    }

    #[test]
    fn test_config_from_env_bad_bind_addr() {
        temp_env::with_var("CFGTEST_BIND_ADDR", Some("not an address"), || {
            Config::from_env("CFGTEST").err().unwrap();
        });
    }
}
