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

//! The `BaseUrls` type.

use crate::env::get_optional_var;
use url::Url;

/// Common error message for URLs built via hardcoded values.
const URL_MUST_BE_VALID: &str = "URLs built in-process must be valid";

/// Checks if `base` has the right format to be a base URL and returns an error if it is not.
fn ensure_valid_base(base: &Url) -> Result<(), String> {
    if base.cannot_be_a_base() || !base.path().ends_with('/') {
        return Err(format!("URL '{}' cannot be a base: missing trailing slash", base));
    }
    Ok(())
}

/// Contains the public base URL of a service and allows building absolute URLs within it.
///
/// Responses carry hypermedia links and `Location` headers that point back at the service, and
/// these must use the address the clients see, which may differ from the bind address.
#[derive(Clone)]
#[cfg_attr(test, derive(Debug, Eq, PartialEq))]
pub struct BaseUrls {
    /// The base URL to the backend service (ourselves).
    backend: Url,
}

impl BaseUrls {
    /// Creates a set of base URLs from an already-parsed URL.
    pub fn new(backend: Url) -> Result<Self, String> {
        ensure_valid_base(&backend)?;
        Ok(Self { backend })
    }

    /// Creates a set of base URLs from the `<prefix>_BACKEND_BASE_URL` environment variable,
    /// falling back to `default` if it is not set.
    pub fn from_env(prefix: &str, default: &str) -> Result<Self, String> {
        let backend = match get_optional_var::<Url>(prefix, "BACKEND_BASE_URL")? {
            Some(url) => url,
            None => Url::parse(default)
                .map_err(|e| format!("Invalid default base URL '{}': {}", default, e))?,
        };
        Self::new(backend)
    }

    /// Creates a set of base URLs from a fixed string, which must represent a valid URL.
    #[cfg(any(test, feature = "testutils"))]
    pub fn from_static(backend: &'static str) -> Self {
        Self::new(Url::parse(backend).unwrap()).unwrap()
    }

    /// Generates a URL to the backend given a `path`, which must be relative.  The `path` can be
    /// empty to obtain a reference to the root.
    pub fn make_backend_url(&self, path: &str) -> Url {
        assert!(!path.starts_with('/'));
        self.backend.join(path).expect(URL_MUST_BE_VALID)
    }

    /// Same as `make_backend_url` but returns the URL as a string, ready to be used as a link.
    pub fn make_backend_href(&self, path: &str) -> String {
        self.make_backend_url(path).to_string()
    }
}
