//! Status and enumeration types stored as TEXT columns.
//!
//! Each enum serializes to its upper-case wire name (the same string that is
//! stored in the database and checked by a `CHECK` constraint). Parsing is
//! case-insensitive so query parameters like `?status=active` are accepted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire / database representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            fn expected() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| {
                        CoreError::Validation(format!(
                            "invalid value '{s}', expected one of {}",
                            Self::expected()
                        ))
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(|_| {
                    serde::de::Error::custom(format!(
                        "invalid value '{raw}', expected one of {}",
                        Self::expected()
                    ))
                })
            }
        }
    };
}

define_status_enum! {
    /// Account status. Only `ACTIVE` users may authenticate.
    #[derive(Default)]
    UserStatus {
        #[default]
        Active = "ACTIVE",
        Inactive = "INACTIVE",
        Suspended = "SUSPENDED",
    }
}

define_status_enum! {
    /// Field lifecycle status.
    #[derive(Default)]
    FieldStatus {
        #[default]
        Active = "ACTIVE",
        Inactive = "INACTIVE",
        Archived = "ARCHIVED",
    }
}

define_status_enum! {
    /// Project lifecycle status.
    #[derive(Default)]
    ProjectStatus {
        #[default]
        Planning = "PLANNING",
        Active = "ACTIVE",
        OnHold = "ON_HOLD",
        Completed = "COMPLETED",
        Cancelled = "CANCELLED",
    }
}

define_status_enum! {
    /// Comparison applied to the condition field of a field rule.
    RuleOperator {
        Equals = "EQUALS",
        NotEquals = "NOT_EQUALS",
        Contains = "CONTAINS",
        In = "IN",
        IsEmpty = "IS_EMPTY",
        IsNotEmpty = "IS_NOT_EMPTY",
    }
}

define_status_enum! {
    /// Effect a field rule applies to its target field.
    RuleAction {
        Show = "SHOW",
        Hide = "HIDE",
        Require = "REQUIRE",
        Optional = "OPTIONAL",
    }
}

define_status_enum! {
    /// How `manage_roles` combines the given role ids with the current set.
    RoleAction {
        Add = "add",
        Remove = "remove",
        Replace = "replace",
    }
}

impl RuleOperator {
    /// Operators that test presence only and take no condition value.
    pub fn is_value_less(self) -> bool {
        matches!(self, RuleOperator::IsEmpty | RuleOperator::IsNotEmpty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("active".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert_eq!("On_Hold".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        assert_eq!("REPLACE".parse::<RoleAction>().unwrap(), RoleAction::Replace);
    }

    #[test]
    fn rejects_unknown_value_listing_choices() {
        let err = "deleted".parse::<FieldStatus>().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("ACTIVE, INACTIVE, ARCHIVED"));
    }

    #[test]
    fn serializes_to_wire_name() {
        let json = serde_json::to_string(&ProjectStatus::OnHold).unwrap();
        assert_eq!(json, "\"ON_HOLD\"");
        let back: ProjectStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProjectStatus::OnHold);
    }

    #[test]
    fn defaults_match_creation_defaults() {
        assert_eq!(UserStatus::default(), UserStatus::Active);
        assert_eq!(FieldStatus::default(), FieldStatus::Active);
        assert_eq!(ProjectStatus::default(), ProjectStatus::Planning);
    }

    #[test]
    fn value_less_operators() {
        assert!(RuleOperator::IsEmpty.is_value_less());
        assert!(!RuleOperator::Equals.is_value_less());
    }
}
