use crate::interval::{EndpointType, IntervalBounds, InvalidInterval};
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Range, RangeInclusive};

/// An immutable interval over a totally-ordered endpoint domain,
/// with independently included or excluded endpoints.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash)]
pub struct Interval<T>
where
    T: EndpointType,
{
    low: T,
    high: T,
    low_included: bool,
    high_included: bool,
}

impl<T> Interval<T>
where
    T: EndpointType,
{
    /// Constructs an interval, validating well-formedness: the high
    /// endpoint must not lie below the low endpoint, and an interval
    /// with equal endpoints must include both of them.
    ///
    /// # Example
    /// ```rust
    /// use ibs_tree::interval::{Interval, InvalidInterval};
    /// let interval = Interval::new(2, true, 10, false)?;
    /// assert_eq!(interval.to_string(), "[2, 10)");
    /// assert_eq!(Interval::new(10, true, 2, true), Err(InvalidInterval::HighBelowLow));
    /// # Ok::<(), InvalidInterval>(())
    /// ```
    pub fn new(
        low: T,
        low_included: bool,
        high: T,
        high_included: bool,
    ) -> Result<Self, InvalidInterval> {
        if high < low {
            return Err(InvalidInterval::HighBelowLow);
        }
        if low == high && !(low_included && high_included) {
            return Err(InvalidInterval::DegenerateExclusion);
        }
        Ok(Self {
            low,
            high,
            low_included,
            high_included,
        })
    }

    /// Constructs the closed interval `[low, high]`.
    ///
    /// # Panics
    /// Panics if `high < low`.
    pub fn closed(low: T, high: T) -> Self {
        Self::new(low, true, high, true).expect("closed interval endpoints out of order")
    }

    /// Constructs the open interval `(low, high)`.
    ///
    /// # Panics
    /// Panics if the interval would be empty.
    pub fn open(low: T, high: T) -> Self {
        Self::new(low, false, high, false).expect("open interval endpoints out of order")
    }

    /// Constructs the half-open interval `[low, high)`.
    ///
    /// # Panics
    /// Panics if the interval would be empty.
    pub fn closed_open(low: T, high: T) -> Self {
        Self::new(low, true, high, false).expect("half-open interval endpoints out of order")
    }

    /// Constructs the half-open interval `(low, high]`.
    ///
    /// # Panics
    /// Panics if the interval would be empty.
    pub fn open_closed(low: T, high: T) -> Self {
        Self::new(low, false, high, true).expect("half-open interval endpoints out of order")
    }

    /// Constructs the degenerate interval `[value, value]`.
    pub fn point(value: T) -> Self {
        Self {
            low: value.clone(),
            high: value,
            low_included: true,
            high_included: true,
        }
    }
}

impl<T> IntervalBounds for Interval<T>
where
    T: EndpointType,
{
    type Endpoint = T;

    fn low(&self) -> T {
        self.low.clone()
    }

    fn high(&self) -> T {
        self.high.clone()
    }

    fn low_included(&self) -> bool {
        self.low_included
    }

    fn high_included(&self) -> bool {
        self.high_included
    }
}

impl<T> Debug for Interval<T>
where
    T: Debug + EndpointType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let open = if self.low_included { '[' } else { '(' };
        let close = if self.high_included { ']' } else { ')' };
        write!(f, "{}{:?}, {:?}{}", open, self.low, self.high, close)
    }
}

impl<T> Display for Interval<T>
where
    T: Display + EndpointType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let open = if self.low_included { '[' } else { '(' };
        let close = if self.high_included { ']' } else { ')' };
        write!(f, "{}{}, {}{}", open, self.low, self.high, close)
    }
}

impl<T> From<(T, T)> for Interval<T>
where
    T: EndpointType,
{
    /// Constructs a closed interval from a tuple.
    ///
    /// # Example
    /// ```rust
    /// use ibs_tree::interval::Interval;
    /// let interval: Interval<_> = (2, 10).into();
    /// assert_eq!(interval, Interval::closed(2, 10));
    /// ```
    fn from(pair: (T, T)) -> Self {
        Self::closed(pair.0, pair.1)
    }
}

impl<T> From<RangeInclusive<T>> for Interval<T>
where
    T: EndpointType,
{
    /// Constructs a closed interval from a `RangeInclusive<T>`.
    ///
    /// # Example
    /// ```rust
    /// use ibs_tree::interval::Interval;
    /// let interval: Interval<_> = (2..=10).into();
    /// assert_eq!(interval, Interval::closed(2, 10));
    /// ```
    fn from(range: RangeInclusive<T>) -> Self {
        let (low, high) = range.into_inner();
        Self::closed(low, high)
    }
}

impl<T> From<&RangeInclusive<T>> for Interval<T>
where
    T: EndpointType,
{
    fn from(range: &RangeInclusive<T>) -> Self {
        Self::closed(range.start().clone(), range.end().clone())
    }
}

impl<T> From<Range<T>> for Interval<T>
where
    T: EndpointType,
{
    /// Constructs a half-open interval from a `Range<T>`.
    ///
    /// # Example
    /// ```rust
    /// use ibs_tree::interval::Interval;
    /// let interval: Interval<_> = (2..10).into();
    /// assert_eq!(interval, Interval::closed_open(2, 10));
    /// ```
    fn from(range: Range<T>) -> Self {
        Self::closed_open(range.start, range.end)
    }
}
