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

//! Route to access table consulted before dispatching requests.

use crate::model::Principal;
use http::Method;

/// Kind of caller that may access a route.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Access {
    /// Anybody, including anonymous callers.
    Public,

    /// Any authenticated caller.
    Authenticated,

    /// Authenticated callers holding the given role.
    Role(&'static str),
}

/// Outcome of checking a request against the access table.
#[derive(Debug, PartialEq)]
pub enum Decision {
    /// The request can proceed.
    Allowed,

    /// The request needs credentials that the caller did not provide.
    Unauthenticated,

    /// The caller is known but lacks the rights to access the route.
    Denied,
}

/// A single entry in the access table.
#[derive(Debug)]
pub struct AccessRule {
    /// Methods this rule applies to, or all of them if empty.
    methods: Vec<Method>,

    /// Path patterns this rule applies to.
    patterns: &'static [&'static str],

    /// Who can access the matching routes.
    access: Access,
}

impl AccessRule {
    /// Creates a rule that applies to `patterns` regardless of the method.
    pub fn any(patterns: &'static [&'static str], access: Access) -> Self {
        Self { methods: vec![], patterns, access }
    }

    /// Creates a rule that only applies to `patterns` when requested with one of `methods`.
    pub fn methods(methods: &[Method], patterns: &'static [&'static str], access: Access) -> Self {
        Self { methods: methods.to_vec(), patterns, access }
    }

    /// Checks if the rule applies to the `method`/`path` pair.
    fn matches(&self, method: &Method, path: &str) -> bool {
        if !self.methods.is_empty() && !self.methods.contains(method) {
            return false;
        }
        self.patterns.iter().any(|pattern| path_matches(pattern, path))
    }
}

/// Checks if `path` matches `pattern` segment by segment.
///
/// A `*` segment in the pattern matches exactly one path segment and a `**` segment matches all
/// remaining ones, including none.
fn path_matches(pattern: &str, path: &str) -> bool {
    let mut pattern = pattern.split('/').filter(|s| !s.is_empty());
    let mut path = path.split('/').filter(|s| !s.is_empty());
    loop {
        match (pattern.next(), path.next()) {
            (Some("**"), _) => return true,
            (None, None) => return true,
            (Some("*"), Some(_)) => (),
            (Some(expected), Some(actual)) if expected == actual => (),
            _ => return false,
        }
    }
}

/// Ordered access table in which the first matching rule wins.
///
/// Routes not matched by any rule require an authenticated caller.
#[derive(Debug, Default)]
pub struct AccessPolicy {
    /// Rules in evaluation order.
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    /// Creates a new policy from `rules`.
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Returns who can access `path` when requested with `method`.
    pub fn access(&self, method: &Method, path: &str) -> Access {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| rule.access)
            .unwrap_or(Access::Authenticated)
    }

    /// Decides if `principal` can issue a `method` request against `path`.
    pub fn decide(&self, method: &Method, path: &str, principal: Option<&Principal>) -> Decision {
        match (self.access(method, path), principal) {
            (Access::Public, _) => Decision::Allowed,
            (_, None) => Decision::Unauthenticated,
            (Access::Authenticated, Some(_)) => Decision::Allowed,
            (Access::Role(role), Some(principal)) => {
                if principal.has_role(role) {
                    Decision::Allowed
                } else {
                    Decision::Denied
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use bibliotheca_core::model::Username;
    use std::collections::BTreeSet;

    /// Creates a principal that holds the given `roles`.
    fn principal(roles: &[&'static str]) -> Principal {
        Principal::new(
            Username::from("someone"),
            roles.iter().map(|r| Role::from(*r)).collect::<BTreeSet<Role>>(),
        )
    }

    /// Creates a policy with a representative set of rules.
    fn policy() -> AccessPolicy {
        AccessPolicy::new(vec![
            AccessRule::any(&["/", "/login", "/static/**"], Access::Public),
            AccessRule::methods(&[Method::POST], &["/items/*/take/*"], Access::Role("TAKER")),
            AccessRule::methods(
                &[Method::PUT, Method::DELETE],
                &["/items/*"],
                Access::Role("EDITOR"),
            ),
            AccessRule::any(&["/items/**"], Access::Public),
        ])
    }

    #[test]
    fn test_path_matches() {
        assert!(path_matches("/", "/"));
        assert!(path_matches("/a/b", "/a/b"));
        assert!(path_matches("/a/b", "/a/b/"));
        assert!(!path_matches("/a/b", "/a"));
        assert!(!path_matches("/a", "/a/b"));
        assert!(path_matches("/a/*", "/a/b"));
        assert!(!path_matches("/a/*", "/a"));
        assert!(!path_matches("/a/*", "/a/b/c"));
        assert!(path_matches("/a/*/c/*", "/a/x/c/y"));
        assert!(path_matches("/a/**", "/a"));
        assert!(path_matches("/a/**", "/a/b/c"));
        assert!(path_matches("/**", "/"));
        assert!(!path_matches("/a/**", "/ab"));
    }

    #[test]
    fn test_first_match_wins() {
        let policy = policy();
        assert_eq!(Access::Role("EDITOR"), policy.access(&Method::PUT, "/items/1"));
        assert_eq!(Access::Public, policy.access(&Method::GET, "/items/1"));
        assert_eq!(Access::Role("TAKER"), policy.access(&Method::POST, "/items/1/take/2"));
        assert_eq!(Access::Public, policy.access(&Method::GET, "/items/1/take/2"));
    }

    #[test]
    fn test_default_is_authenticated() {
        let policy = policy();
        assert_eq!(Access::Authenticated, policy.access(&Method::GET, "/other"));
        assert_eq!(Access::Authenticated, AccessPolicy::default().access(&Method::GET, "/"));
    }

    #[test]
    fn test_decide() {
        let policy = policy();
        assert_eq!(Decision::Allowed, policy.decide(&Method::GET, "/login", None));
        assert_eq!(Decision::Unauthenticated, policy.decide(&Method::GET, "/other", None));
        assert_eq!(
            Decision::Allowed,
            policy.decide(&Method::GET, "/other", Some(&principal(&[])))
        );
        assert_eq!(Decision::Unauthenticated, policy.decide(&Method::PUT, "/items/1", None));
        assert_eq!(
            Decision::Denied,
            policy.decide(&Method::PUT, "/items/1", Some(&principal(&["TAKER"])))
        );
        assert_eq!(
            Decision::Allowed,
            policy.decide(&Method::DELETE, "/items/1", Some(&principal(&["TAKER", "EDITOR"])))
        );
    }
}
