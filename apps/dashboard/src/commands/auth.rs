//! # Auth Commands
//!
//! Picks which role dashboard a shared terminal shows. The password is
//! accepted and ignored.

use bistro_core::User;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// Who is signed in and where their dashboard lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: User,
    pub dashboard_route: String,
}

impl From<User> for SessionResponse {
    fn from(user: User) -> Self {
        SessionResponse {
            dashboard_route: user.role.dashboard_route().to_string(),
            user,
        }
    }
}

pub async fn login(
    session: &SessionState,
    db: &DbState,
    email: String,
    password: String,
) -> Result<SessionResponse, ApiError> {
    debug!(email = %email, "login command");
    let (user, snapshot) = session.mutate(|s| s.login(&email, &password))?;
    db.mirror(&snapshot).await;
    Ok(SessionResponse::from(user))
}

pub async fn logout(session: &SessionState, db: &DbState) {
    debug!("logout command");
    let snapshot = session.with_store_mut(|s| {
        s.logout();
        s.snapshot()
    });
    db.mirror(&snapshot).await;
}

pub fn current_session(session: &SessionState) -> Option<SessionResponse> {
    session.with_store(|s| s.current_user().cloned().map(SessionResponse::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::tests::test_dashboard;

    #[tokio::test]
    async fn test_login_routes_by_role() {
        let d = test_dashboard().await;
        let response = login(&d.session, &d.db, "cashier@restaurant.com".into(), "x".into())
            .await
            .unwrap();
        assert_eq!(response.dashboard_route, "/cashier");
        assert_eq!(current_session(&d.session).unwrap().user.id, "5");

        logout(&d.session, &d.db).await;
        assert!(current_session(&d.session).is_none());
    }

    #[tokio::test]
    async fn test_unknown_email_is_unauthorized() {
        let d = test_dashboard().await;
        let err = login(&d.session, &d.db, "nobody@x.com".into(), String::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_session_survives_in_snapshot() {
        let d = test_dashboard().await;
        login(&d.session, &d.db, "chef@restaurant.com".into(), String::new())
            .await
            .unwrap();
        let saved = d
            .db
            .inner()
            .snapshots()
            .load(bistro_core::STORE_NAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.current_user.map(|u| u.id), Some("3".to_string()));
    }
}
