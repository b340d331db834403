//! Hash set selection for the identity-keyed interval sets.

#[cfg(feature = "hashbrown")]
pub use hashbrown::hash_set::{IntoIter, Iter};
#[cfg(feature = "hashbrown")]
pub use hashbrown::HashSet;

#[cfg(not(feature = "hashbrown"))]
pub use std::collections::hash_set::{IntoIter, Iter};
#[cfg(not(feature = "hashbrown"))]
pub use std::collections::HashSet;
