//! Reference rows inserted by the seed migration.
//!
//! `MemoryStore::seeded` inserts the same rows so in-memory tests start from
//! the state a freshly migrated database is in.

/// Name of the role granted to the bootstrap administrator.
pub const ADMIN_ROLE: &str = "Admin";

/// A seeded role: name, description, colour, permissions.
pub struct SeedRole {
    pub name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub permissions: &'static [&'static str],
}

pub const SEED_ROLES: &[SeedRole] = &[
    SeedRole {
        name: ADMIN_ROLE,
        description: "Full administrative access",
        color: "#DC2626",
        permissions: &[
            "fields:manage",
            "projects:manage",
            "roles:manage",
            "users:manage",
        ],
    },
    SeedRole {
        name: "User",
        description: "Standard access",
        color: "#6B7280",
        permissions: &["projects:read"],
    },
];

/// Built-in field types, flagged `is_system`.
pub const SYSTEM_FIELD_TYPES: &[&str] = &[
    "text",
    "number",
    "date",
    "select",
    "multi_select",
    "boolean",
    "user",
];
