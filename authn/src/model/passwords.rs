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

//! The `Password` and `HashedPassword` data types.
//!
//! Hashes are stored with a `{scheme}` prefix so that multiple encoders can coexist.  New hashes
//! always use bcrypt.  Hashes produced by the legacy salted SHA-256 encoder still verify but are
//! reported by `HashedPassword::needs_upgrade` so that they can be replaced on the next login.

use base64::Engine;
use base64::engine::general_purpose;
use bibliotheca_core::model::{ModelError, ModelResult};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Prefix of hashes generated by the current encoder.
const BCRYPT_PREFIX: &str = "{bcrypt}";

/// Prefix of hashes generated by the legacy encoder.
const LEGACY_PREFIX: &str = "{SHA-256}";

/// Number of random bytes in the salt of legacy hashes.
const LEGACY_SALT_LENGTH: usize = 32;

/// Maximum length of a password, in bytes.  Long enough for any policy-compliant password.
const MAX_PASSWORD_LENGTH: usize = 1024;

/// Default bcrypt cost for new hashes.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// An opaque type to hold a password, protecting it from leaking into logs.
#[derive(Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
#[cfg_attr(any(test, feature = "testutils"), derive(Clone))]
pub struct Password(String);

impl Password {
    /// Creates a new password from a literal string.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.len() > MAX_PASSWORD_LENGTH {
            return Err(ModelError("Password is too long".to_owned()));
        }
        Ok(Password(s))
    }

    /// Returns a string view of the password.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// Hashes the password with the current encoder (bcrypt with `cost`).
    ///
    /// Consumes the password because there is no context in which keeping the password alive
    /// once we have generated its hash is correct.
    pub fn hash(self, cost: u32) -> ModelResult<HashedPassword> {
        let hashed =
            bcrypt::hash(self.0, cost).map_err(|e| ModelError(format!("Password error: {}", e)))?;
        Ok(HashedPassword(format!("{}{}", BCRYPT_PREFIX, hashed)))
    }

    /// Hashes the password with the legacy salted SHA-256 encoder.
    ///
    /// Only useful to populate accounts that predate the bcrypt migration.
    pub fn hash_legacy(self) -> HashedPassword {
        let mut salt = [0u8; LEGACY_SALT_LENGTH];
        rand::rng().fill_bytes(&mut salt);
        let salt = general_purpose::STANDARD.encode(salt);
        let digest = legacy_digest(&self.0, &salt);
        HashedPassword(format!("{}{{{}}}{}", LEGACY_PREFIX, salt, digest))
    }

    /// Verifies if this password matches a given `hash`.
    ///
    /// Hashes with an unknown scheme never match.
    pub fn verify(&self, hash: &HashedPassword) -> ModelResult<bool> {
        if let Some(raw) = hash.0.strip_prefix(BCRYPT_PREFIX) {
            bcrypt::verify(&self.0, raw).map_err(|e| ModelError(format!("Password error: {}", e)))
        } else if let Some(raw) = hash.0.strip_prefix(LEGACY_PREFIX) {
            let Some((salt, digest)) = raw.strip_prefix('{').and_then(|r| r.split_once('}')) else {
                return Err(ModelError("Password error: malformed legacy hash".to_owned()));
            };
            Ok(legacy_digest(&self.0, salt) == digest.to_lowercase())
        } else {
            Ok(false)
        }
    }
}

/// Computes the hex digest of the legacy encoder for `password` and `salt`.
fn legacy_digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(format!("{{{}}}", salt).as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(any(test, feature = "testutils"))]
impl From<&'static str> for Password {
    /// Creates a new password from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        Password::new(s).expect("Hardcoded passwords must be valid")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed password")
    }
}

/// An opaque type to hold a hashed password, protecting it from leaking into logs.
#[derive(Clone, PartialEq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Creates a new hashed password from a literal string, as read from storage.
    pub fn new<S: Into<String>>(s: S) -> Self {
        HashedPassword(s.into())
    }

    /// Returns a string view of the hash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the hash was not produced by the current encoder.
    pub fn needs_upgrade(&self) -> bool {
        !self.0.starts_with(BCRYPT_PREFIX)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed hash")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cost to use in tests for speed.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_password_ok() {
        assert_eq!(Password::from("foo"), Password::new("foo").unwrap());
        assert_eq!("bar", Password::new("bar").unwrap().as_str());
    }

    #[test]
    fn test_password_error() {
        assert!(Password::new("x".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let password1 = Password::from("first password");
        let password2 = Password::from("second password");
        let hash1 = password1.clone().hash(TEST_COST).unwrap();
        let hash2 = password2.clone().hash(TEST_COST).unwrap();

        assert!(hash1.as_str().starts_with("{bcrypt}$2b$04$"));
        assert!(hash2.as_str().starts_with("{bcrypt}$2b$04$"));
        assert!(hash1 != hash2);
        assert!(!hash1.needs_upgrade());

        assert!(password1.verify(&hash1).unwrap());
        assert!(!password2.verify(&hash1).unwrap());
        assert!(!password1.verify(&hash2).unwrap());
        assert!(password2.verify(&hash2).unwrap());
    }

    #[test]
    fn test_password_hash_legacy_and_verify() {
        let password = Password::from("wayne");
        let hash = password.clone().hash_legacy();

        assert!(hash.as_str().starts_with("{SHA-256}{"));
        assert!(hash.needs_upgrade());
        assert!(password.verify(&hash).unwrap());
        assert!(!Password::from("Wayne").verify(&hash).unwrap());

        assert!(password.clone().hash_legacy() != hash, "Salts must differ");
    }

    #[test]
    fn test_password_verify_known_legacy_hash() {
        let digest = legacy_digest("secret", "salt");
        let hash = HashedPassword::new(format!("{{SHA-256}}{{salt}}{}", digest.to_uppercase()));
        assert!(Password::from("secret").verify(&hash).unwrap());
    }

    #[test]
    fn test_password_verify_malformed_legacy_hash() {
        let hash = HashedPassword::new("{SHA-256}nosalt");
        Password::from("secret").verify(&hash).unwrap_err();
    }

    #[test]
    fn test_password_verify_unknown_scheme() {
        let raw = bcrypt::hash("secret", TEST_COST).unwrap();
        let hash = HashedPassword::new(raw);
        assert!(hash.needs_upgrade());
        assert!(!Password::from("secret").verify(&hash).unwrap());
        assert!(!Password::from("secret").verify(&HashedPassword::new("{noop}secret")).unwrap());
    }

    #[test]
    fn test_password_debug_is_scrubbed() {
        assert_eq!("scrubbed password", format!("{:?}", Password::from("hidden")));
        assert_eq!("scrubbed hash", format!("{:?}", HashedPassword::new("{bcrypt}hidden")));
    }
}
