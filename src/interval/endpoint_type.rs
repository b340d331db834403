//! Alias trait for endpoint domains.

/// Alias trait for values that can serve as interval endpoints.
///
/// Endpoints need a total order so that every pair of keys in the
/// endpoint tree compares; this rules out floating-point types.
///
/// # Example
/// ```rust
/// use ibs_tree::interval::EndpointType;
///
/// fn span_width<T: EndpointType>(low: T, high: T) -> (T, T) {
///     (low, high)
/// }
///
/// let _ = span_width(3i32, 7i32);
/// ```
pub trait EndpointType: Clone + Ord {}

impl<T> EndpointType for T where T: Clone + Ord {}
