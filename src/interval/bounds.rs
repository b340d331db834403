use crate::interval::EndpointType;

/// The capability set the endpoint tree requires of its elements:
/// the two endpoint values, their inclusion flags, and the derived
/// containment and overlap tests.
///
/// Elements are compared by endpoint values here; *identity* of
/// elements inside the tree is reference identity of their handles.
pub trait IntervalBounds {
    type Endpoint: EndpointType;

    /// The low endpoint value.
    fn low(&self) -> Self::Endpoint;

    /// The high endpoint value.
    fn high(&self) -> Self::Endpoint;

    /// Whether the low endpoint itself belongs to the interval.
    fn low_included(&self) -> bool;

    /// Whether the high endpoint itself belongs to the interval.
    fn high_included(&self) -> bool;

    /// Tests whether the point `p` lies inside the interval,
    /// honoring the inclusion flags.
    fn contains_point(&self, p: &Self::Endpoint) -> bool {
        let low = self.low();
        let high = self.high();
        (low < *p || (low == *p && self.low_included()))
            && (*p < high || (*p == high && self.high_included()))
    }

    /// Tests whether this interval shares at least one point with `other`.
    fn overlaps<O>(&self, other: &O) -> bool
    where
        O: IntervalBounds<Endpoint = Self::Endpoint>,
    {
        low_before_high(self, other) && low_before_high(other, self)
    }
}

/// `a.low` lies at or before `b.high`, counting a shared endpoint only
/// when both sides include it.
fn low_before_high<A, B>(a: &A, b: &B) -> bool
where
    A: IntervalBounds + ?Sized,
    B: IntervalBounds<Endpoint = A::Endpoint> + ?Sized,
{
    let low = a.low();
    let high = b.high();
    low < high || (low == high && a.low_included() && b.high_included())
}
