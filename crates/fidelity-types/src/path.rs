//! Structural DOM paths.
//!
//! Instrumentation identifies nodes by an XPath-like string built from the
//! ancestor chain and a per-level sibling ordinal, e.g.
//! `/html[1]/body[1]/div[2]/button[1]`. Relations between paths are always
//! computed on whole segments, never on raw string prefixes, so
//! `/html[1]/body[1]/div[1]` is not an ancestor of `/html[1]/body[1]/div[12]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed structural path.
///
/// Empty segments are dropped while parsing, so `"/a//b/"` and `"/a/b"` are
/// the same path. The root path (`"/"` or `""`) has no segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StructuralPath {
    segments: Vec<String>,
}

impl StructuralPath {
    /// Parse a path string. Parsing never fails.
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// The document root.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, or `None` for the root.
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path of the parent node, or `None` for the root.
    pub fn parent(&self) -> Option<StructuralPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Builder method: append a child segment.
    pub fn child(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// True if `self` is `other` or one of its ancestors (root-to-leaf
    /// segment comparison).
    pub fn is_ancestor_or_equal(&self, other: &StructuralPath) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a == b)
    }

    /// True if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &StructuralPath) -> bool {
        self.segments.len() < other.segments.len() && self.is_ancestor_or_equal(other)
    }

    /// True if both paths end in the same leaf segment. The root has no leaf
    /// and never shares one.
    pub fn shares_leaf(&self, other: &StructuralPath) -> bool {
        match (self.leaf(), other.leaf()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl From<String> for StructuralPath {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for StructuralPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<StructuralPath> for String {
    fn from(path: StructuralPath) -> Self {
        path.to_string()
    }
}
