// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::s3::utils::url_encode;
use std::collections::BTreeMap;

/// Multimap for string key and string value
pub type Multimap = multimap::MultiMap<String, String>;

pub trait MultimapExt {
    /// Appends a value to the values of `key`
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V);

    /// Replaces all values of `key` by `value`
    fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V);

    /// Adds a multimap to the current multimap
    fn add_multimap(&mut self, other: Multimap);

    /// Replaces any `versionId` value when `version` is set
    fn set_version(&mut self, version: Option<String>);

    /// Converts multimap to HTTP query string
    fn to_query_string(&self) -> String;

    /// Converts multimap to canonical query string
    fn get_canonical_query_string(&self) -> String;

    /// Converts multimap to signed headers and canonical headers
    fn get_canonical_headers(&self) -> (String, String);
}

fn encode_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut query = String::new();
    for (key, value) in pairs {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&url_encode(key));
        query.push('=');
        query.push_str(&url_encode(value));
    }
    query
}

impl MultimapExt for Multimap {
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.insert(key.into(), value.into());
    }

    fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key: String = key.into();
        self.remove(&key);
        self.insert(key, value.into());
    }

    fn add_multimap(&mut self, other: Multimap) {
        for (key, values) in other.into_iter() {
            self.insert_many(key, values);
        }
    }

    fn set_version(&mut self, version: Option<String>) {
        if let Some(v) = version {
            self.set("versionId", v);
        }
    }

    fn to_query_string(&self) -> String {
        encode_pairs(
            self.iter_all()
                .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str()))),
        )
    }

    fn get_canonical_query_string(&self) -> String {
        let mut sorted: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (key, values) in self.iter_all() {
            let entry = sorted.entry(key.as_str()).or_default();
            entry.extend(values.iter().map(String::as_str));
            entry.sort_unstable();
        }
        encode_pairs(
            sorted
                .iter()
                .flat_map(|(k, vs)| vs.iter().map(move |v| (*k, *v))),
        )
    }

    fn get_canonical_headers(&self) -> (String, String) {
        let mut btmap: BTreeMap<String, String> = BTreeMap::new();

        for (k, values) in self.iter_all() {
            let key = k.to_lowercase();
            if key == "authorization" || key == "user-agent" {
                continue;
            }

            let mut vs: Vec<String> = values
                .iter()
                .map(|v| v.split_whitespace().collect::<Vec<_>>().join(" "))
                .collect();
            vs.sort();

            let entry = btmap.entry(key).or_default();
            for v in vs {
                if !entry.is_empty() {
                    entry.push(',');
                }
                entry.push_str(&v);
            }
        }

        let signed_headers = btmap.keys().cloned().collect::<Vec<_>>().join(";");
        let canonical_headers = btmap
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join("\n");

        (signed_headers, canonical_headers)
    }
}
