//! Snapshot fixtures over the sample domain.

use crate::domain::{Address, Building, Car, User, UserRole};
use auditrail_types::{EntityState, TrackedEntitySnapshot};
use serde_json::Value;

/// Building in the given state with unmodified values.
pub fn building(state: EntityState, user_id: i64, name: &str, number: i64) -> TrackedEntitySnapshot {
    TrackedEntitySnapshot::builder::<Building>(state)
        .key("AddressUserId", user_id)
        .value("Name", name)
        .value("Number", number)
        .build()
}

/// Address in the given state with unmodified values, owning `building`.
pub fn address(
    state: EntityState,
    user_id: i64,
    city: &str,
    street: &str,
    building: TrackedEntitySnapshot,
) -> TrackedEntitySnapshot {
    TrackedEntitySnapshot::builder::<Address>(state)
        .key("UserId", user_id)
        .value("City", city)
        .value("Street", street)
        .owns("Building", building)
        .build()
}

/// A newly added user with a full address.
pub fn added_user(id: i64, name: &str, password: &str) -> TrackedEntitySnapshot {
    TrackedEntitySnapshot::builder::<User>(EntityState::Added)
        .table_name("Users")
        .key("Id", id)
        .value("Name", name)
        .value("Password", password)
        .value("AdditionalInformation", Value::Null)
        .value("CarId", 1)
        .owns(
            "Address",
            address(
                EntityState::Added,
                id,
                "X",
                "Main",
                building(EntityState::Added, id, "Tower", 7),
            ),
        )
        .build()
}

/// A user in `state` whose own columns are untouched and whose address
/// city moved from `from` to `to`.
pub fn user_with_city_change(id: i64, from: &str, to: &str) -> TrackedEntitySnapshot {
    let address = TrackedEntitySnapshot::builder::<Address>(EntityState::Modified)
        .key("UserId", id)
        .changed("City", from, to)
        .value("Street", "Main")
        .owns("Building", building(EntityState::Unchanged, id, "Tower", 7))
        .build();

    TrackedEntitySnapshot::builder::<User>(EntityState::Modified)
        .table_name("Users")
        .key("Id", id)
        .value("Name", "John")
        .value("Password", "hunter2")
        .value("CarId", 1)
        .owns("Address", address)
        .build()
}

pub fn car(state: EntityState, id: i64, name: &str) -> TrackedEntitySnapshot {
    TrackedEntitySnapshot::builder::<Car>(state)
        .table_name("Cars")
        .key("Id", id)
        .value("Name", name)
        .build()
}

pub fn user_role(state: EntityState, id: i64, role: &str, user_id: i64) -> TrackedEntitySnapshot {
    TrackedEntitySnapshot::builder::<UserRole>(state)
        .table_name("UserRoles")
        .key("Id", id)
        .value("Role", role)
        .value("UserId", user_id)
        .build()
}
