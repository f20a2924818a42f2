use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} value: {value}")]
pub struct InvalidEnum {
    pub field: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The wire spelling doubles as the serde name.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Gender {
    Male => "Male",
    Female => "Female",
});

str_enum!(RiskLevel {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

str_enum!(Role {
    Physician => "physician",
    Admin => "admin",
});

str_enum!(ChatRole {
    User => "user",
    Model => "model",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn gender_parses_exact_spelling_only() {
        assert_eq!(Gender::from_str("Female").unwrap(), Gender::Female);
        let err = Gender::from_str("female").unwrap_err();
        assert_eq!(err.field, "Gender");
        assert_eq!(err.value, "female");
    }

    #[test]
    fn risk_level_serializes_capitalized() {
        let json = serde_json::to_string(&RiskLevel::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
        let parsed: RiskLevel = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(parsed, RiskLevel::High);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Physician).unwrap(), "\"physician\"");
        assert!(serde_json::from_str::<Role>("\"Physician\"").is_err());
    }

    #[test]
    fn all_lists_every_variant_in_order() {
        let names: Vec<&str> = RiskLevel::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["Low", "Medium", "High"]);
        assert_eq!(ChatRole::ALL.len(), 2);
    }
}
