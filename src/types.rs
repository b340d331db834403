mod hashset;

pub(crate) use hashset::{HashSet, IntoIter as HashSetIntoIter, Iter as HashSetIter};
