use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScopeKind {
    Group,
    Event,
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScopeKind::Group => "GROUP",
            ScopeKind::Event => "EVENT",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub name: String,
}

/// A group or an event (trip) whose shared expenses get settled together.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Scope {
    pub id: String,
    pub kind: ScopeKind,
    pub name: String,
    /// Set for events, which always belong to a group.
    pub parent_group_id: Option<String>,
    pub members: Vec<Member>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl Scope {
    pub fn is_member(&self, member_id: &str) -> bool {
        self.members.iter().any(|m| m.id == member_id)
    }

    /// Display name for a member, falling back to the raw id.
    pub fn member_name(&self, member_id: &str) -> String {
        self.members
            .iter()
            .find(|m| m.id == member_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| member_id.to_string())
    }
}
