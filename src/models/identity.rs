use serde::{Deserialize, Serialize};

use super::enums::Role;

/// The locally mocked logged-in user. Persisted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub email: String,
}
