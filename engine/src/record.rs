//! User record types.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// A user as served by the remote directory.
///
/// Field names on the wire follow the remote API (`first_name`, `avatar`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identifier assigned by the remote store
    pub id: UserId,
    /// Contact email
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Avatar image URL
    #[serde(rename = "avatar", default)]
    pub avatar_url: String,
}

impl UserRecord {
    /// Create a new record.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            avatar_url: String::new(),
        }
    }

    /// Set the avatar URL.
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = url.into();
        self
    }

    /// Overwrite the fields present in `patch`.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
    }
}

/// Partial update of a user's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    /// Fill every absent field from `record`.
    ///
    /// The remote update endpoint expects the full editable triple.
    pub fn completed_from(&self, record: &UserRecord) -> UserPatch {
        UserPatch {
            first_name: Some(
                self.first_name
                    .clone()
                    .unwrap_or_else(|| record.first_name.clone()),
            ),
            last_name: Some(
                self.last_name
                    .clone()
                    .unwrap_or_else(|| record.last_name.clone()),
            ),
            email: Some(self.email.clone().unwrap_or_else(|| record.email.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_wire_user() {
        let user: UserRecord = serde_json::from_value(json!({
            "id": 1,
            "email": "a@x.com",
            "first_name": "A",
            "last_name": "B",
            "avatar": "https://img/1.jpg"
        }))
        .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.first_name, "A");
        assert_eq!(user.avatar_url, "https://img/1.jpg");
    }

    #[test]
    fn missing_avatar_defaults_to_empty() {
        let user: UserRecord = serde_json::from_value(json!({
            "id": 2, "email": "b@x.com", "first_name": "B", "last_name": "C"
        }))
        .unwrap();

        assert!(user.avatar_url.is_empty());
    }

    #[test]
    fn apply_patch_only_touches_present_fields() {
        let mut user = UserRecord::new(1, "ann@x.com", "Ann", "Lee");
        user.apply(&UserPatch::new().first_name("Anna"));

        assert_eq!(user.first_name, "Anna");
        assert_eq!(user.last_name, "Lee");
        assert_eq!(user.email, "ann@x.com");
    }

    #[test]
    fn completed_patch_carries_full_triple() {
        let user = UserRecord::new(1, "ann@x.com", "Ann", "Lee");
        let patch = UserPatch::new().email("anna@x.com").completed_from(&user);

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"first_name": "Ann", "last_name": "Lee", "email": "anna@x.com"})
        );
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let patch = UserPatch::new();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");
    }
}
