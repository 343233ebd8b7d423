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


//! API to list the configuration of the service.

use axum::Json;
use bibliotheca_core::env::list_vars_with_prefix;
use bibliotheca_core::rest::EmptyBody;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefixes of the environment variables that configure the service.
pub(crate) const CONFIG_PREFIXES: &[&str] = &["LIBRARY", "PGSQL_PROD"];

/// Replacement for the values of all variables.
const MASK: &str = "******";

/// A single configuration property.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct PropertyValue {
    /// Value of the property, always masked.
    pub(crate) value: String,
}

/// A group of configuration properties coming from the same place.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct PropertySource {
    /// Name of the source.
    pub(crate) name: String,

    /// Properties by name.
    pub(crate) properties: BTreeMap<String, PropertyValue>,
}

/// Message returned by the server with its configuration.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnvResponse {
    /// Always empty.
    pub(crate) active_profiles: Vec<String>,

    /// Sources of configuration properties.
    pub(crate) property_sources: Vec<PropertySource>,
}

/// Collects the names of the configuration variables present in the environment.
fn collect() -> EnvResponse {
    let properties = CONFIG_PREFIXES
        .iter()
        .flat_map(|prefix| list_vars_with_prefix(prefix))
        .map(|name| (name, PropertyValue { value: MASK.to_owned() }))
        .collect();
    EnvResponse {
        active_profiles: vec![],
        property_sources: vec![PropertySource {
            name: "systemEnvironment".to_owned(),
            properties,
        }],
    }
}

/// GET handler for this API.
pub(crate) async fn handler(_: EmptyBody) -> Json<EnvResponse> {
    Json(collect())
}
