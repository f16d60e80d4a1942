//! User claim sets.
//!
//! Claims are arbitrary key/value entries attached to a user and carried
//! into their session on sign-in. Two entries have meaning to QuestVault:
//! the string `role` (assigned by the role callable) and the boolean
//! `admin` (grants access to the role callable itself).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim entry key for the assignable role.
pub const ROLE_CLAIM: &str = "role";

/// Claim entry key for the administrator flag.
pub const ADMIN_CLAIM: &str = "admin";

/// A user's custom claim set.
///
/// A thin wrapper over a JSON object. Stored as `jsonb` in the user table
/// and persisted as a whole: updates load the existing set, modify the
/// relevant entry, and write everything back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    /// Create an empty claim set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The assigned role, if any.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.0.get(ROLE_CLAIM).and_then(Value::as_str)
    }

    /// Whether the `admin` entry is the boolean `true`.
    ///
    /// Any other value (absent, string `"true"`, number) does not grant
    /// administrator access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0.get(ADMIN_CLAIM).and_then(Value::as_bool) == Some(true)
    }

    /// Overwrite the `role` entry, leaving every other entry untouched.
    pub fn set_role(&mut self, role: &str) {
        self.0
            .insert(ROLE_CLAIM.to_owned(), Value::String(role.to_owned()));
    }

    /// Set the administrator flag.
    pub fn set_admin(&mut self, admin: bool) {
        self.0.insert(ADMIN_CLAIM.to_owned(), Value::Bool(admin));
    }

    /// Look up an arbitrary claim entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of entries in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ClaimSet> for Value {
    fn from(claims: ClaimSet) -> Self {
        Self::Object(claims.0)
    }
}

impl TryFrom<Value> for ClaimSet {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_set_has_no_role_and_no_admin() {
        let claims = ClaimSet::new();
        assert_eq!(claims.role(), None);
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_set_role_overwrites_only_role() {
        let mut claims: ClaimSet = ClaimSet::try_from(json!({
            "admin": true,
            "role": "basic",
            "beta_tester": true,
        }))
        .unwrap();

        claims.set_role("editor");

        assert_eq!(claims.role(), Some("editor"));
        assert!(claims.is_admin());
        assert_eq!(claims.get("beta_tester"), Some(&json!(true)));
        assert_eq!(claims.len(), 3);
    }

    #[test]
    fn test_admin_must_be_boolean_true() {
        let truthy: ClaimSet = ClaimSet::try_from(json!({ "admin": "true" })).unwrap();
        assert!(!truthy.is_admin());

        let numeric: ClaimSet = ClaimSet::try_from(json!({ "admin": 1 })).unwrap();
        assert!(!numeric.is_admin());

        let real: ClaimSet = ClaimSet::try_from(json!({ "admin": true })).unwrap();
        assert!(real.is_admin());
    }

    #[test]
    fn test_non_string_role_is_ignored() {
        let claims: ClaimSet = ClaimSet::try_from(json!({ "role": 7 })).unwrap();
        assert_eq!(claims.role(), None);
    }

    #[test]
    fn test_rejects_non_object_json() {
        assert!(ClaimSet::try_from(json!(["role"])).is_err());
        assert!(ClaimSet::try_from(json!("admin")).is_err());
    }

    #[test]
    fn test_serde_round_trip_preserves_entries() {
        let mut claims = ClaimSet::new();
        claims.set_role("moderator");
        claims.set_admin(false);

        let value = Value::from(claims.clone());
        let back = ClaimSet::try_from(value).unwrap();
        assert_eq!(back, claims);
    }
}
