//! Authentication collaborator interface
//!
//! The content layer does not gate reads or writes itself; the backing
//! store's own access rules enforce authorization. Tooling only needs to
//! know who is signed in and whether they are an admin.

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub uid: String,
    pub email: Option<String>,
}

/// Supplies the current user and the is-admin flag
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<CurrentUser>;
    fn is_admin(&self) -> bool;
}

/// Fixed-identity provider for local tooling and tests
pub struct StaticAuth {
    user: Option<CurrentUser>,
    admin: bool,
}

impl StaticAuth {
    pub fn admin(uid: impl Into<String>) -> Self {
        Self {
            user: Some(CurrentUser {
                uid: uid.into(),
                email: None,
            }),
            admin: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            admin: false,
        }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<CurrentUser> {
        self.user.clone()
    }

    fn is_admin(&self) -> bool {
        self.admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_auth() {
        let auth = StaticAuth::admin("local");
        assert!(auth.is_admin());
        assert_eq!(auth.current_user().unwrap().uid, "local");

        let auth = StaticAuth::anonymous();
        assert!(!auth.is_admin());
        assert!(auth.current_user().is_none());
    }
}
