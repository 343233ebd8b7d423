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

//! Generic data types shared by all services.

use thiserror::Error;

mod emailaddress;
pub use emailaddress::EmailAddress;
mod username;
pub use username::Username;

/// Model errors.
#[derive(Debug, Error, PartialEq)]
#[error("{0}")]
pub struct ModelError(pub String);

/// Result type for this module.
pub type ModelResult<T> = Result<T, ModelError>;

/// Builds the error reported when the `field` of the request `object` holds an invalid `value`.
pub fn field_error(object: &str, field: &str, value: &str, reason: &str) -> ModelError {
    ModelError(format!(
        "Field error in object '{}' on field '{}': rejected value [{}]; {}",
        object, field, value, reason
    ))
}

/// Collects the field errors of a request so that all of them are reported together.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<ModelError>);

impl FieldErrors {
    /// Records the error in `result`, if any.
    pub fn check<T>(&mut self, result: ModelResult<T>) {
        if let Err(e) = result {
            self.push(e);
        }
    }

    /// Records the error `e`.
    pub fn push(&mut self, e: ModelError) {
        self.0.push(e);
    }

    /// Returns an error with all recorded messages, in recording order and joined by `,`, or
    /// success if there were none.
    pub fn into_result(self) -> ModelResult<()> {
        if self.0.is_empty() {
            return Ok(());
        }
        let messages: Vec<String> = self.0.into_iter().map(|e| e.0).collect();
        Err(ModelError(messages.join(",")))
    }
}

/// Ensures that `value`, which represents the `field` of the request `object`, has between `min`
/// and `max` characters.
pub fn validate_size(
    object: &str,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> ModelResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(field_error(
            object,
            field,
            value,
            &format!("size must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Ensures that `value`, which represents the `field` of the request `object`, is not blank and is
/// at most `max` characters long.
pub fn validate_text(object: &str, field: &str, value: &str, max: usize) -> ModelResult<()> {
    if value.trim().is_empty() {
        return Err(field_error(object, field, value, "must not be blank"));
    }
    validate_size(object, field, value, 0, max)
}
