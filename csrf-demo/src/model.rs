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


//! Data types for the customer registry.

use derive_getters::Getters;
use derive_more::Constructor;
use uuid::Uuid;

/// Maximum number of characters in a customer name.
pub(crate) const MAX_NAME_LENGTH: usize = 100;

/// A customer of the registry.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct Customer {
    /// Public identifier of the customer.
    identifier: Uuid,

    /// Given name.
    first_name: String,

    /// Family name.
    last_name: String,
}
