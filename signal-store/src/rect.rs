//! Rectangle value type with dimension iteration
//!
//! A small demonstration of explicit iteration: a [`Rectangle`] yields its
//! two dimensions as single-key entries, length first, through a finite,
//! restartable iterator. Each call to [`Rectangle::dimensions`] starts a
//! fresh sequence; nothing is materialized up front.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;

/// An immutable rectangle with integer dimensions
///
/// No validation is applied; zero and negative dimensions are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    length: i64,
    width: i64,
}

impl Rectangle {
    /// Create a rectangle from its two dimensions
    pub fn new(length: i64, width: i64) -> Self {
        Self { length, width }
    }

    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    /// Iterate over the dimensions, length first
    ///
    /// # Example
    /// ```
    /// use signal_store::{Dimension, Rectangle};
    ///
    /// let rect = Rectangle::new(10, 5);
    /// let dims: Vec<Dimension> = rect.dimensions().collect();
    /// assert_eq!(dims, vec![Dimension::Length(10), Dimension::Width(5)]);
    /// ```
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            rect: *self,
            pos: 0,
        }
    }
}

/// One dimension entry yielded by [`Dimensions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length(i64),
    Width(i64),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Length(v) => write!(f, "{{length: {}}}", v),
            Dimension::Width(v) => write!(f, "{{width: {}}}", v),
        }
    }
}

/// Iterator over a rectangle's dimensions
///
/// Yields exactly two items and then `None` forever.
#[derive(Debug, Clone)]
pub struct Dimensions {
    rect: Rectangle,
    pos: u8,
}

impl Iterator for Dimensions {
    type Item = Dimension;

    fn next(&mut self) -> Option<Dimension> {
        let item = match self.pos {
            0 => Dimension::Length(self.rect.length),
            1 => Dimension::Width(self.rect.width),
            _ => return None,
        };
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = 2usize.saturating_sub(self.pos as usize);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Dimensions {}
impl FusedIterator for Dimensions {}

impl IntoIterator for &Rectangle {
    type Item = Dimension;
    type IntoIter = Dimensions;

    fn into_iter(self) -> Dimensions {
        self.dimensions()
    }
}
