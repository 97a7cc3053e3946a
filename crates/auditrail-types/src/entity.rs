//! Entity type identity.
//!
//! Audit policy is keyed by entity type. A type takes part in auditing by
//! implementing [`Entity`], which names the type and fixes the enum of its
//! properties. Configuration code refers to properties through that enum, so
//! a property that does not exist on the type cannot be named.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A property of an audited entity.
pub trait EntityProperty: Copy + 'static {
    /// Name of the property as it appears in snapshots and change records.
    fn name(self) -> &'static str;
}

/// An entity type that can be audited.
pub trait Entity: 'static {
    /// Type name, also the default table name of its snapshots.
    const NAME: &'static str;

    /// Properties of the entity.
    type Property: EntityProperty;
}

/// Runtime identity of an [`Entity`] type.
///
/// Equality and hashing use the Rust type identity only; the name is carried
/// for logs and default table names.
#[derive(Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
}

impl EntityType {
    /// Identity of `E`.
    pub fn of<E: Entity>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: E::NAME,
        }
    }

    /// Entity type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityType({})", self.name)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declare the property enum of an entity and implement [`Entity`] for it.
///
/// ```
/// use auditrail_types::{audited_entity, Entity, EntityProperty};
///
/// pub struct User;
///
/// audited_entity! {
///     User => UserProperty { Id, Name, Password }
/// }
///
/// assert_eq!(User::NAME, "User");
/// assert_eq!(UserProperty::Password.name(), "Password");
/// assert_eq!(UserProperty::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! audited_entity {
    ($entity:ident => $property:ident { $($variant:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $property {
            $($variant),+
        }

        impl $property {
            /// Every property of the entity, in declaration order.
            pub const ALL: &'static [$property] = &[$($property::$variant),+];
        }

        impl $crate::EntityProperty for $property {
            fn name(self) -> &'static str {
                match self {
                    $($property::$variant => stringify!($variant)),+
                }
            }
        }

        impl $crate::Entity for $entity {
            const NAME: &'static str = stringify!($entity);
            type Property = $property;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Car;
    struct Building;

    audited_entity! {
        Car => CarProperty { Id, Name }
    }

    audited_entity! {
        Building => BuildingProperty { Name, Number }
    }

    #[test]
    fn test_entity_type_identity() {
        let car = EntityType::of::<Car>();
        assert_eq!(car, EntityType::of::<Car>());
        assert_ne!(car, EntityType::of::<Building>());
        assert_eq!(car.name(), "Car");
        assert_eq!(format!("{:?}", car), "EntityType(Car)");
    }

    #[test]
    fn test_entity_type_hashes_by_identity() {
        let mut set = HashSet::new();
        set.insert(EntityType::of::<Car>());
        set.insert(EntityType::of::<Car>());
        set.insert(EntityType::of::<Building>());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_macro_property_names() {
        assert_eq!(CarProperty::Name.name(), "Name");
        assert_eq!(BuildingProperty::Number.name(), "Number");
        let names: Vec<_> = BuildingProperty::ALL.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Name", "Number"]);
    }
}
