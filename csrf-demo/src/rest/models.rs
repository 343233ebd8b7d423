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


//! Types exchanged with clients of the registry.
//!
//! Customer names leave the service through `escaping::sanitize`.

use crate::model::{Customer, MAX_NAME_LENGTH};
use bibliotheca_core::model::{FieldErrors, ModelResult, validate_size, validate_text};
use bibliotheca_core::rest::escaping::sanitize;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the customer object in validation errors.
const CUSTOMER: &str = "customer";

/// Public view of a customer.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerModel {
    /// Public identifier.
    pub(crate) identifier: Uuid,

    /// Given name.
    pub(crate) first_name: String,

    /// Family name.
    pub(crate) last_name: String,
}

impl From<&Customer> for CustomerModel {
    fn from(customer: &Customer) -> Self {
        Self {
            identifier: *customer.identifier(),
            first_name: sanitize(customer.first_name()),
            last_name: sanitize(customer.last_name()),
        }
    }
}

/// Names of a new customer, as sent in JSON bodies and in forms.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerRequest {
    /// Given name.
    pub(crate) first_name: String,

    /// Family name.
    pub(crate) last_name: String,
}

impl CustomerRequest {
    /// Checks that both names are present and not too long.
    pub(crate) fn validate(self) -> ModelResult<Self> {
        let mut errors = FieldErrors::default();
        errors.check(validate_text(CUSTOMER, "firstName", &self.first_name, MAX_NAME_LENGTH));
        errors.check(validate_text(CUSTOMER, "lastName", &self.last_name, MAX_NAME_LENGTH));
        errors.into_result()?;
        Ok(self)
    }
}

/// Names of a new customer, as sent in the query string of the unsafe creation API.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct CreateQuery {
    /// Given name.
    pub(crate) firstname: String,

    /// Family name.
    pub(crate) lastname: String,
}

impl CreateQuery {
    /// Checks that both names have an acceptable length.
    pub(crate) fn validate(self) -> ModelResult<CustomerRequest> {
        let mut errors = FieldErrors::default();
        errors.check(validate_size(CUSTOMER, "firstname", &self.firstname, 1, MAX_NAME_LENGTH));
        errors.check(validate_size(CUSTOMER, "lastname", &self.lastname, 1, MAX_NAME_LENGTH));
        errors.into_result()?;
        Ok(CustomerRequest { first_name: self.firstname, last_name: self.lastname })
    }
}
