use std::{error, fmt};

/// The collection was empty, so no element could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyCollection;

impl fmt::Display for EmptyCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the interval collection is empty")
    }
}

impl error::Error for EmptyCollection {}
