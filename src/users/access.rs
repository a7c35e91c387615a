//! Page access gating.
//!
//! Some pages need a signed-in user, others additionally need a complete
//! profile. [`evaluate`] decides where the user should go.

use super::types::UserRecord;
use crate::auth::AuthUser;

/// Route of the login page.
pub const LOGIN_PATH: &str = "/";

/// Route of the profile completion page.
pub const COMPLETE_PROFILE_PATH: &str = "/completar-perfil";

/// What a page needs before it may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequirement {
    /// Any signed-in user.
    SignedIn,
    /// A signed-in user with a complete profile.
    CompleteProfile,
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Show the page.
    Allow,
    /// Send the user to the login page.
    RedirectToLogin,
    /// Send the user to the profile completion page.
    RedirectToCompleteProfile,
}

impl AccessDecision {
    /// Route to redirect to, if any.
    #[must_use]
    pub const fn redirect_path(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(LOGIN_PATH),
            Self::RedirectToCompleteProfile => Some(COMPLETE_PROFILE_PATH),
        }
    }
}

/// Returns whether the user's profile is complete.
///
/// The display name comes from the auth user, falling back to the record.
/// Phone and address come from the record; a missing record is incomplete.
#[must_use]
pub fn is_profile_complete(user: &AuthUser, record: Option<&UserRecord>) -> bool {
    let Some(record) = record else {
        return false;
    };

    let has_name =
        user.display_name_trimmed().is_some() || !record.display_name.trim().is_empty();
    has_name && !record.phone.trim().is_empty() && !record.address.trim().is_empty()
}

/// Decides whether a page may be shown.
#[must_use]
pub fn evaluate(
    user: Option<&AuthUser>,
    record: Option<&UserRecord>,
    requirement: AccessRequirement,
) -> AccessDecision {
    let Some(user) = user else {
        return AccessDecision::RedirectToLogin;
    };

    match requirement {
        AccessRequirement::SignedIn => AccessDecision::Allow,
        AccessRequirement::CompleteProfile if is_profile_complete(user, record) => {
            AccessDecision::Allow
        }
        AccessRequirement::CompleteProfile => AccessDecision::RedirectToCompleteProfile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> UserRecord {
        UserRecord {
            id: "u1".to_string(),
            phone: "11912345678".to_string(),
            address: "Rua A, 10".to_string(),
            ..UserRecord::default()
        }
    }

    #[test]
    fn anonymous_goes_to_login() {
        assert_eq!(
            evaluate(None, None, AccessRequirement::SignedIn),
            AccessDecision::RedirectToLogin
        );
        let record = complete_record();
        assert_eq!(
            evaluate(None, Some(&record), AccessRequirement::CompleteProfile),
            AccessDecision::RedirectToLogin
        );
    }

    #[test]
    fn signed_in_is_enough_for_basic_pages() {
        let user = AuthUser::new("u1");
        assert_eq!(
            evaluate(Some(&user), None, AccessRequirement::SignedIn),
            AccessDecision::Allow
        );
    }

    #[test]
    fn complete_profile_needs_name_phone_address() {
        let named = AuthUser::new("u1").with_display_name("Ana");
        let unnamed = AuthUser::new("u1");
        let record = complete_record();

        assert!(is_profile_complete(&named, Some(&record)));
        assert!(!is_profile_complete(&unnamed, Some(&record)));
        assert!(!is_profile_complete(&named, None));

        let mut named_record = record;
        named_record.display_name = "Ana".to_string();
        assert!(is_profile_complete(&unnamed, Some(&named_record)));
    }

    #[test]
    fn incomplete_profile_redirects() {
        let user = AuthUser::new("u1").with_display_name("Ana");
        let record = UserRecord {
            address: String::new(),
            ..complete_record()
        };
        let requirement = AccessRequirement::CompleteProfile;
        let decision = evaluate(Some(&user), Some(&record), requirement);
        assert_eq!(decision, AccessDecision::RedirectToCompleteProfile);
        assert_eq!(decision.redirect_path(), Some("/completar-perfil"));
    }

    #[test]
    fn redirect_paths() {
        assert_eq!(AccessDecision::Allow.redirect_path(), None);
        assert_eq!(AccessDecision::RedirectToLogin.redirect_path(), Some("/"));
    }
}
