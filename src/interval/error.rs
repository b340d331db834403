use std::{error, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInterval {
    /// The high endpoint was below the low endpoint.
    HighBelowLow,
    /// The endpoints were equal but at least one of them was excluded.
    DegenerateExclusion,
}

impl fmt::Display for InvalidInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::HighBelowLow => write!(f, "the high endpoint lies below the low endpoint"),
            Self::DegenerateExclusion => {
                write!(f, "an interval with equal endpoints must include both")
            }
        }
    }
}

impl error::Error for InvalidInterval {}
