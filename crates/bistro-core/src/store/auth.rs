//! Session sign-in.
//!
//! This is a role switch for a shared terminal, not a security boundary:
//! the password is accepted and ignored, and any active staff email works.

use tracing::{info, warn};

use super::Store;
use crate::error::{CoreError, CoreResult};
use crate::types::User;

impl Store {
    /// Signs in the active user with this email (case-insensitive).
    pub fn login(&mut self, email: &str, _password: &str) -> CoreResult<User> {
        let email = email.trim();
        let user = self
            .data
            .users
            .iter()
            .find(|u| u.is_active && u.email.eq_ignore_ascii_case(email))
            .cloned();

        match user {
            Some(user) => {
                info!(user_id = %user.id, role = ?user.role, "Logged in");
                self.data.current_user = Some(user.clone());
                Ok(user)
            }
            None => {
                warn!(email = %email, "Login rejected");
                Err(CoreError::LoginRejected {
                    email: email.to_string(),
                })
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.data.current_user.take() {
            info!(user_id = %user.id, "Logged out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::UserPatch;
    use crate::store::tests::seeded_store;
    use crate::types::UserRole;

    #[test]
    fn test_login_by_email_ignores_password() {
        let (mut store, _) = seeded_store();
        let user = store.login("Chef@Restaurant.com ", "wrong").unwrap();
        assert_eq!(user.role, UserRole::Chef);
        assert_eq!(user.role.dashboard_route(), "/kitchen");
        assert!(store.is_authenticated());

        store.logout();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_login_rejects_unknown_and_inactive() {
        let (mut store, _) = seeded_store();
        assert!(matches!(
            store.login("ghost@restaurant.com", ""),
            Err(CoreError::LoginRejected { .. })
        ));

        store
            .update_user(
                "6",
                UserPatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(store.login("lisa@restaurant.com", "").is_err());
        assert!(!store.is_authenticated());
    }
}
