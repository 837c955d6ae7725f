//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: a `Username`
/// or a `Minutes` has no identity of its own. They are validated once at
/// construction, so holders never need to re-check them.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Minutes(u32);
///
/// impl ValueObject for Minutes {}
///
/// assert_eq!(Minutes(30), Minutes(30));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
