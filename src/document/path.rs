//! Concrete paths into a value tree.
//!
//! A `Path` is an ordered list of segments. Each segment is either a key
//! (applies to objects) or an index (applies to arrays); which one resolves
//! depends only on the kind of value met at that depth.
//!
//! # Example
//!
//! ```
//! use pathquill::document::path::{Path, Segment};
//!
//! let path = Path::root().key("students").index(0).key("name");
//! assert_eq!(path.len(), 3);
//! assert_eq!(path.segments()[1], Segment::Index(0));
//! assert_eq!(path.to_string(), "students/0/name");
//! ```

use std::fmt;

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Selects a field of an object
    Key(String),
    /// Selects an element of an array
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// An ordered sequence of segments naming one position in a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Creates the empty path, which names the root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a list of segments.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Returns this path extended by a key segment.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Returns this path extended by an index segment.
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Returns a copy of this path with one more segment.
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Splits off the last segment, returning the parent path and the segment.
    pub fn split_last(&self) -> Option<(&[Segment], &Segment)> {
        let (last, parent) = self.segments.split_last()?;
        Some((parent, last))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl AsRef<[Segment]> for Path {
    fn as_ref(&self) -> &[Segment] {
        &self.segments
    }
}

/// Builds a `Path` from a mix of keys and indices.
///
/// ```
/// use pathquill::path;
/// use pathquill::document::path::Path;
///
/// let p = path!["students", 0usize, "name"];
/// assert_eq!(p, Path::root().key("students").index(0).key("name"));
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::document::path::Path::root()
    };
    ($($segment:expr),+ $(,)?) => {
        $crate::document::path::Path::new(vec![
            $($crate::document::path::Segment::from($segment)),+
        ])
    };
}
