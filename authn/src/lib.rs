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

//! Authentication and authorization for the Bibliotheca services.
//!
//! This crate provides the pieces that sit between the HTTP layer and the business logic of the
//! apps: password hashing and policy checks, the route to role access table, sessions backed by
//! the `JSESSIONID` cookie and CSRF protection for state-changing requests.
//!
//! Apps plug in their own user storage by implementing `driver::CredentialStore`.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

pub mod authz;
pub mod driver;
pub mod model;
pub mod policy;
pub mod rest;
pub mod wordlist;
