// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical content hashing.
//!
//! `cid` is the single hashing primitive every other component reduces its
//! structured content to. The structural shape is
//! `null | bool | int | string | bytes | list<x> | map<string, x>`; maps hash
//! independent of insertion order because [`Structural::Map`] is backed by a
//! `BTreeMap`, whose iteration order is already the sorted-key order the
//! canonical encoding requires. Floats are rejected outright — callers must
//! pre-serialize them to a fixed string representation before hashing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// The structural shape that `cid` hashes over.
///
/// Deliberately smaller than `serde_json::Value`: there is no `Float`
/// variant, since floats are forbidden at the hashing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structural {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Structural>),
    Map(BTreeMap<String, Structural>),
}

impl Structural {
    pub fn map(entries: impl IntoIterator<Item = (String, Structural)>) -> Self {
        Structural::Map(entries.into_iter().collect())
    }

    /// Encode into the canonical byte form that gets hashed.
    ///
    /// Each variant is prefixed with a single tag byte so that, e.g., the
    /// integer `1` and the one-character string `"1"` never collide.
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Structural::Null => out.push(0),
            Structural::Bool(b) => {
                out.push(1);
                out.push(*b as u8);
            }
            Structural::Int(i) => {
                out.push(2);
                out.extend_from_slice(&i.to_be_bytes());
            }
            Structural::Str(s) => {
                out.push(3);
                out.extend_from_slice(&(s.len() as u64).to_be_bytes());
                out.extend_from_slice(s.as_bytes());
            }
            Structural::Bytes(b) => {
                out.push(4);
                out.extend_from_slice(&(b.len() as u64).to_be_bytes());
                out.extend_from_slice(b);
            }
            Structural::List(items) => {
                out.push(5);
                out.extend_from_slice(&(items.len() as u64).to_be_bytes());
                for item in items {
                    item.encode(out);
                }
            }
            Structural::Map(entries) => {
                out.push(6);
                out.extend_from_slice(&(entries.len() as u64).to_be_bytes());
                // BTreeMap iterates in sorted-key order already.
                for (k, v) in entries {
                    out.extend_from_slice(&(k.len() as u64).to_be_bytes());
                    out.extend_from_slice(k.as_bytes());
                    v.encode(out);
                }
            }
        }
    }
}

impl From<bool> for Structural {
    fn from(b: bool) -> Self {
        Structural::Bool(b)
    }
}

impl From<i64> for Structural {
    fn from(i: i64) -> Self {
        Structural::Int(i)
    }
}

impl From<u64> for Structural {
    fn from(i: u64) -> Self {
        Structural::Int(i as i64)
    }
}

impl From<&str> for Structural {
    fn from(s: &str) -> Self {
        Structural::Str(s.to_string())
    }
}

impl From<String> for Structural {
    fn from(s: String) -> Self {
        Structural::Str(s)
    }
}

impl From<Vec<u8>> for Structural {
    fn from(b: Vec<u8>) -> Self {
        Structural::Bytes(b)
    }
}

impl<T: Into<Structural>> From<Vec<T>> for Structural {
    fn from(items: Vec<T>) -> Self {
        Structural::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Structural>> From<Option<T>> for Structural {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Structural::Null,
        }
    }
}

/// A content identifier: a multibase-encoded canonical hash.
///
/// Encoded with the real multibase `f` prefix (RFC "base16", lowercase hex) —
/// a legitimate multibase encoding, not a bespoke format, while keeping the
/// implementation to a single well-known crate (`hex`) instead of pulling in
/// a dedicated multibase crate for one prefix byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_raw(multibase_str: impl Into<String>) -> Self {
        Cid(multibase_str.into())
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<[u8]> for Cid {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Compute the canonical content hash over a structural value.
///
/// Deterministic across processes and platforms, independent of map
/// insertion order, and injective modulo SHA-256 collision resistance.
pub fn cid(value: &Structural) -> Cid {
    let mut buf = Vec::new();
    value.encode(&mut buf);
    let digest = Sha256::digest(&buf);
    Cid(format!("f{}", hex::encode(digest)))
}

/// Convenience: hash a JSON value, rejecting floats.
///
/// Most callers (Manifest, JobConfig reduction) already hold a
/// `serde_json::Value`; this avoids hand-building a `Structural` tree at
/// every call site.
pub fn cid_json(value: &serde_json::Value) -> Result<Cid, FloatNotAllowed> {
    Ok(cid(&json_to_structural(value)?))
}

#[derive(Debug, thiserror::Error)]
#[error("floats are not permitted at the hashing layer; pre-serialize to a string")]
pub struct FloatNotAllowed;

fn json_to_structural(value: &serde_json::Value) -> Result<Structural, FloatNotAllowed> {
    Ok(match value {
        serde_json::Value::Null => Structural::Null,
        serde_json::Value::Bool(b) => Structural::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Structural::Int(i)
            } else if let Some(u) = n.as_u64() {
                Structural::Int(u as i64)
            } else {
                return Err(FloatNotAllowed);
            }
        }
        serde_json::Value::String(s) => Structural::Str(s.clone()),
        serde_json::Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(json_to_structural(item)?);
            }
            Structural::List(out)
        }
        serde_json::Value::Object(map) => {
            let mut out = BTreeMap::new();
            for (k, v) in map {
                out.insert(k.clone(), json_to_structural(v)?);
            }
            Structural::Map(out)
        }
    })
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
