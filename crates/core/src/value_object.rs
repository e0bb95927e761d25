//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** - they have no
/// identity of their own. Two value objects with the same values are equal.
/// To "modify" one, create a new one with the new values.
///
/// Example:
/// - a resolved attribute pair (key "color", value "red") is a value object
/// - a product SPU with a `SpuId` is an entity
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
