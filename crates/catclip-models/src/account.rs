//! Instagram account models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AccountId;

/// An Instagram account the pipeline can publish to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InstagramAccount {
    /// Graph API user ID
    pub id: AccountId,

    /// Handle without the leading @
    pub username: String,

    /// Graph API access token (never serialized)
    #[serde(default, skip_serializing)]
    pub access_token: String,

    /// Primary distribution account that receives promoted posts
    #[serde(default)]
    pub is_main_account: bool,

    /// Inactive accounts are skipped when posting
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl InstagramAccount {
    pub fn new(
        id: impl Into<AccountId>,
        username: impl Into<String>,
        access_token: impl Into<String>,
        is_main_account: bool,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            access_token: access_token.into(),
            is_main_account,
            is_active: true,
        }
    }

    /// Set whether the account is active.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Active account used for trial posts.
    pub fn is_test_account(&self) -> bool {
        self.is_active && !self.is_main_account
    }

    /// Active main account that promoted posts go to.
    pub fn is_postable_main(&self) -> bool {
        self.is_active && self.is_main_account
    }
}

impl fmt::Debug for InstagramAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstagramAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("access_token", &"<redacted>")
            .field("is_main_account", &self.is_main_account)
            .field("is_active", &self.is_active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_not_serialized_or_debug_printed() {
        let account = InstagramAccount::new("test1", "cat_vibes_1", "secret-token", false);

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("secret-token"));

        let debug = format!("{:?}", account);
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_account_roles() {
        let test = InstagramAccount::new("test1", "cat_vibes_1", "t", false);
        let main = InstagramAccount::new("main", "main_cat_account", "t", true);
        let inactive = InstagramAccount::new("test2", "cat_vibes_2", "", false).with_active(false);

        assert!(test.is_test_account());
        assert!(!test.is_postable_main());
        assert!(main.is_postable_main());
        assert!(!main.is_test_account());
        assert!(!inactive.is_test_account());
    }
}
