use crate::auth::{Profile, Session, User, UserId};

/// A snapshot of who is signed in.
///
/// `profile` is only ever set while `user` is set and belongs to that user.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// The signed-in user.
    pub user: Option<User>,
    /// The signed-in user's profile, once it has been fetched.
    pub profile: Option<Profile>,
    /// The signed-in user's session.
    pub session: Option<Session>,
    /// Whether the profile of `user` is being fetched.
    pub profile_pending: bool,
    /// Whether the first session lookup, including the profile fetch, is
    /// still in flight.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            profile: None,
            session: None,
            profile_pending: false,
            loading: true,
        }
    }
}

impl SessionState {
    /// Whether `user_id` is signed in and the fetch of their profile has
    /// finished, whether or not it found one.
    pub fn is_settled_for(&self, user_id: &UserId) -> bool {
        self.user.as_ref().map(|user| &user.id) == Some(user_id) && !self.profile_pending
    }

    /// The user's first name, falling back to their email.
    pub fn display_name(&self) -> Option<&str> {
        let first_name = self
            .profile
            .as_ref()
            .and_then(|profile| profile.first_name.as_deref())
            .filter(|name| !name.is_empty());

        first_name.or_else(|| self.user.as_ref().and_then(|user| user.email.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::{Profile, User, UserId};

    use super::SessionState;

    fn signed_in_state(first_name: Option<&str>) -> SessionState {
        let id = UserId::new("user-1");

        SessionState {
            user: Some(User {
                id: id.clone(),
                email: Some("foo@bar.baz".to_owned()),
            }),
            profile: Some(Profile {
                id,
                first_name: first_name.map(str::to_owned),
                last_name: None,
                phone: None,
            }),
            session: None,
            profile_pending: false,
            loading: false,
        }
    }

    #[test]
    fn default_state_is_loading_without_user() {
        let state = SessionState::default();

        assert!(state.loading);
        assert!(!state.is_settled_for(&UserId::new("user-1")));
        assert_eq!(state.display_name(), None);
    }

    #[test]
    fn settled_only_for_current_user_after_profile_fetch() {
        let mut state = signed_in_state(Some("Ada"));

        assert!(state.is_settled_for(&UserId::new("user-1")));
        assert!(!state.is_settled_for(&UserId::new("user-2")));

        state.profile_pending = true;
        assert!(!state.is_settled_for(&UserId::new("user-1")));
    }

    #[test]
    fn display_name_prefers_first_name() {
        assert_eq!(signed_in_state(Some("Ada")).display_name(), Some("Ada"));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(signed_in_state(None).display_name(), Some("foo@bar.baz"));
        assert_eq!(signed_in_state(Some("")).display_name(), Some("foo@bar.baz"));
    }
}
