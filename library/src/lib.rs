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


//! Library lending service: a catalog of books that registered users can borrow and return.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
compile_error!("At least one of the postgres or sqlite features must be enabled");

use bibliotheca_authn::driver::{AuthnDriver, AuthnOptions};
use bibliotheca_authn::policy::PasswordPolicy;
use bibliotheca_authn::rest::AuthnState;
use bibliotheca_authn::wordlist::WordList;
use bibliotheca_core::db::Db;
use bibliotheca_core::env::get_optional_var;
use bibliotheca_core::rest::{BaseUrls, DEFAULT_REALM};
use log::info;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

mod db;
mod driver;
use driver::{DbCredentialStore, Driver};
mod model;
mod rest;

/// Prefix of the environment variables that configure the service.
pub const ENV_PREFIX: &str = "LIBRARY";

/// Prefix of the environment variables that configure the PostgreSQL connection.
#[cfg(feature = "postgres")]
const PGSQL_PREFIX: &str = "PGSQL_PROD";

/// Default address to listen on.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:9090";

/// Default public base URL of the service.
const DEFAULT_BASE_URL: &str = "http://localhost:9090/";

/// Default SQLite database, which does not survive restarts.
#[cfg(feature = "sqlite")]
const DEFAULT_SQLITE_PATH: &str = ":memory:";

/// Database backends that the service can run on.
#[derive(Debug)]
enum Backend {
    /// A PostgreSQL server described by the `PGSQL_PROD_*` variables.
    #[cfg(feature = "postgres")]
    Postgres,

    /// An SQLite database at the given path.
    #[cfg(feature = "sqlite")]
    Sqlite(String),
}

/// Configuration of the service.
pub struct Config {
    /// Address to listen on.
    bind_addr: SocketAddr,

    /// Public base URL of the service, used in links.
    base_urls: BaseUrls,

    /// Where the data lives.
    backend: Backend,

    /// Whether to populate an empty database with sample data.
    seed_data: bool,

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

        let database = get_optional_var::<String>(prefix, "DATABASE")?;
        let backend = match database.as_deref().unwrap_or("sqlite") {
            #[cfg(feature = "postgres")]
            "postgres" => Backend::Postgres,

            #[cfg(feature = "sqlite")]
            "sqlite" => Backend::Sqlite(
                get_optional_var::<String>(prefix, "SQLITE_PATH")?
                    .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_owned()),
            ),

            other => return Err(format!("Unsupported database backend '{}'", other)),
        };

        let authn = AuthnOptions::from_env(prefix)?;

        Ok(Self {
            bind_addr,
            base_urls: BaseUrls::from_env(prefix, DEFAULT_BASE_URL)?,
            backend,
            seed_data: get_optional_var::<bool>(prefix, "SEED_DATA")?.unwrap_or(true),
            authn,
        })
    }
}

/// Opens the database selected in the configuration.
async fn connect(backend: &Backend) -> Result<Arc<dyn Db + Send + Sync>, Box<dyn Error>> {
    match backend {
        #[cfg(feature = "postgres")]
        Backend::Postgres => {
            use bibliotheca_core::db::postgres::{PostgresDb, PostgresOptions};
            let opts = PostgresOptions::from_env(PGSQL_PREFIX)?;
            info!("Using PostgreSQL database {} at {}:{}", opts.database, opts.host, opts.port);
            Ok(Arc::new(PostgresDb::connect(opts)?))
        }

        #[cfg(feature = "sqlite")]
        Backend::Sqlite(path) => {
            info!("Using SQLite database {}", path);
            Ok(Arc::new(bibliotheca_core::db::sqlite::connect(path).await?))
        }
    }
}

/// Instantiates all resources to serve the application as described by `config`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(config: Config) -> Result<(), Box<dyn Error>> {
    let db = connect(&config.backend).await?;
    db::init_schema(&mut db.ex().await?).await?;

    let policy = PasswordPolicy::new(WordList::from_env(ENV_PREFIX));
    let driver = Driver::new(db.clone(), policy, config.authn.bcrypt_cost);
    if config.seed_data {
        driver.clone().seed().await?;
    }

    let store = Arc::from(DbCredentialStore::new(db));
    let authn = AuthnState::new(
        AuthnDriver::new(store, DEFAULT_REALM, config.authn),
        rest::access_policy(),
    );
    let app = rest::app(driver, Arc::from(config.base_urls), authn);

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
            "CFGTEST_BACKEND_BASE_URL",
            "CFGTEST_DATABASE",
            "CFGTEST_SQLITE_PATH",
            "CFGTEST_SEED_DATA",
            "CFGTEST_BCRYPT_COST",
        ];
        temp_env::with_vars_unset(overrides, || {
            let config = Config::from_env("CFGTEST").unwrap();
            assert_eq!(SocketAddr::from(([127, 0, 0, 1], 9090)), config.bind_addr);
            assert_eq!(
                "http://localhost:9090/books",
                config.base_urls.make_backend_href("books")
            );
            assert!(matches!(config.backend, Backend::Sqlite(ref path) if path == ":memory:"));
            assert!(config.seed_data);
            assert_eq!(10, config.authn.bcrypt_cost);
        });
    }

    #[test]
    fn test_config_from_env_overrides() {
        let overrides = [
            ("CFGTEST_BIND_ADDR", Some("0.0.0.0:8000")),
            ("CFGTEST_BACKEND_BASE_URL", Some("https://library.example.com/")),
            ("CFGTEST_DATABASE", Some("sqlite")),
            ("CFGTEST_SQLITE_PATH", Some("/tmp/library.db")),
            ("CFGTEST_SEED_DATA", Some("false")),
            ("CFGTEST_BCRYPT_COST", Some("12")),
        ];
        temp_env::with_vars(overrides, || {
            let config = Config::from_env("CFGTEST").unwrap();
            assert_eq!(SocketAddr::from(([0, 0, 0, 0], 8000)), config.bind_addr);
            assert_eq!(
                "https://library.example.com/users",
                config.base_urls.make_backend_href("users")
            );
            assert!(
                matches!(config.backend, Backend::Sqlite(ref path) if path == "/tmp/library.db")
            );
            assert!(!config.seed_data);
            assert_eq!(12, config.authn.bcrypt_cost);
        });
    }

    #[test]
    fn test_config_from_env_bad_backend() {
        temp_env::with_var("CFGTEST_DATABASE", Some("oracle"), || {
            assert_eq!(
                Some("Unsupported database backend 'oracle'".to_owned()),
                Config::from_env("CFGTEST").err()
            );
        });
    }
}
