// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire format shared by every Daikin response.
//!
//! Units answer both UDP probes and HTTP requests with a single line of
//! comma-separated `key=value` pairs whose first pair is always the status
//! token, for example:
//!
//! ```text
//! ret=OK,pow=1,mode=3,stemp=22.0,shum=0,f_rate=A,f_dir=0
//! ```
//!
//! [`decode`] splits such a body into a [`RawRecord`], [`validate`] checks the
//! `ret` token and strips it, and [`encode_query`] renders a record as the
//! query string of an outgoing request.
//!
//! # Examples
//!
//! ```
//! use daikin_lib::wire;
//!
//! let payload = wire::parse_response(b"ret=OK,pow=1,mode=4").unwrap();
//! assert_eq!(payload.get("mode"), Some("4"));
//! assert!(payload.get("ret").is_none());
//! ```

mod codec;
mod status;

pub use codec::{decode, encode_query, encode_response};
pub use status::{ReturnCode, STATUS_KEY, parse_response, validate};

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

/// Decoded but untyped wire payload.
///
/// Keys are protocol-defined; keys this library does not know about are kept
/// as-is so that they survive a read-modify-write cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, String>);

impl RawRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a value, returning it.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Returns `true` if the record has a value for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy holding only the listed keys that are present.
    #[must_use]
    pub fn restrict_to(&self, keys: &[&str]) -> Self {
        self.0
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Copies every field of `other` into `self`; `other` wins on conflicts.
    pub fn overlay(&mut self, other: &RawRecord) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for RawRecord {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RawRecord {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
