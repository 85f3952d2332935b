/// Numeric conversion helpers.
///
/// Provides checked conversions between integer and floating-point types that
/// refuse to lose precision silently. Used by the value model when widening
/// integer variables for real-valued access.
pub mod num;
