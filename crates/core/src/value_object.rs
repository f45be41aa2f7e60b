//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and defined entirely by their attribute
/// values; two instances with the same values are interchangeable. Order and
/// stock lines are value objects, while `Item` or `Order` are entities with
/// identity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
