//! The stream of auth-state changes produced by an auth client.
//!
//! Every sign in, sign out and token refresh is published as an [AuthEvent].
//! Listeners hold an [AuthSubscription]; once it is dropped or
//! [AuthSubscription::unsubscribe] is called, no further events are delivered
//! to it.

use tokio::sync::broadcast;

use crate::auth::Session;

/// How many events a slow subscriber may fall behind before it starts missing
/// events.
const EVENT_BUFFER_SIZE: usize = 16;

/// What happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    /// A user signed in with a password or by signing up.
    SignedIn,
    /// The session was cleared, either by the user or because it could not be
    /// refreshed.
    SignedOut,
    /// The access token was replaced, the user is unchanged.
    TokenRefreshed,
}

/// A change to the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthEvent {
    /// What happened.
    pub kind: AuthEventKind,
    /// The session after the change, `None` when signed out.
    pub session: Option<Session>,
}

/// The publishing side of the auth-state stream.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthEvents {
    /// Create a stream with no subscribers.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { sender }
    }

    /// Publish an event to every current subscriber.
    pub fn emit(&self, kind: AuthEventKind, session: Option<Session>) {
        if self.sender.send(AuthEvent { kind, session }).is_err() {
            tracing::debug!("No subscribers for auth event {kind:?}");
        }
    }

    /// Start listening for events published after this call.
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: Some(self.sender.subscribe()),
        }
    }
}

/// The reasons an [AuthSubscription] may not yield an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    /// The subscriber fell behind and this many events were skipped.
    #[error("missed {0} auth events")]
    Lagged(u64),
    /// The subscription was released or the publisher is gone.
    #[error("the subscription is closed")]
    Closed,
}

/// A handle to the auth-state stream.
///
/// Dropping the handle releases the subscription.
#[derive(Debug)]
pub struct AuthSubscription {
    receiver: Option<broadcast::Receiver<AuthEvent>>,
}

impl AuthSubscription {
    /// Wait for the next event.
    ///
    /// # Errors
    /// Returns [SubscriptionError::Closed] once the subscription has been
    /// released, and [SubscriptionError::Lagged] if events were missed.
    pub async fn recv(&mut self) -> Result<AuthEvent, SubscriptionError> {
        let Some(receiver) = self.receiver.as_mut() else {
            return Err(SubscriptionError::Closed);
        };

        receiver.recv().await.map_err(|error| match error {
            broadcast::error::RecvError::Lagged(skipped) => SubscriptionError::Lagged(skipped),
            broadcast::error::RecvError::Closed => SubscriptionError::Closed,
        })
    }

    /// Release the subscription. Events that were queued but not yet received
    /// are discarded.
    pub fn unsubscribe(&mut self) {
        self.receiver = None;
    }

    /// Whether [AuthSubscription::unsubscribe] has been called.
    pub fn is_closed(&self) -> bool {
        self.receiver.is_none()
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::{Session, User, UserId};

    use super::{AuthEventKind, AuthEvents, SubscriptionError};

    fn test_session() -> Session {
        Session {
            access_token: "access".to_owned(),
            refresh_token: "refresh".to_owned(),
            expires_at: i64::MAX,
            user: User {
                id: UserId::new("user-1"),
                email: Some("foo@bar.baz".to_owned()),
            },
        }
    }

    #[tokio::test]
    async fn subscriber_receives_events_in_order() {
        let events = AuthEvents::new();
        let mut subscription = events.subscribe();

        events.emit(AuthEventKind::SignedIn, Some(test_session()));
        events.emit(AuthEventKind::SignedOut, None);

        let first = subscription.recv().await.unwrap();
        assert_eq!(first.kind, AuthEventKind::SignedIn);
        assert_eq!(first.session, Some(test_session()));

        let second = subscription.recv().await.unwrap();
        assert_eq!(second.kind, AuthEventKind::SignedOut);
        assert_eq!(second.session, None);
    }

    #[tokio::test]
    async fn no_events_after_unsubscribe() {
        let events = AuthEvents::new();
        let mut subscription = events.subscribe();
        events.emit(AuthEventKind::SignedIn, Some(test_session()));

        subscription.unsubscribe();
        events.emit(AuthEventKind::SignedOut, None);

        assert!(subscription.is_closed());
        assert_eq!(subscription.recv().await, Err(SubscriptionError::Closed));
    }

    #[tokio::test]
    async fn events_before_subscribing_are_not_delivered() {
        let events = AuthEvents::new();
        events.emit(AuthEventKind::SignedIn, Some(test_session()));

        let mut subscription = events.subscribe();
        events.emit(AuthEventKind::SignedOut, None);

        let event = subscription.recv().await.unwrap();
        assert_eq!(event.kind, AuthEventKind::SignedOut);
    }

    #[tokio::test]
    async fn slow_subscriber_is_told_it_lagged() {
        let events = AuthEvents::new();
        let mut subscription = events.subscribe();

        for _ in 0..(super::EVENT_BUFFER_SIZE + 4) {
            events.emit(AuthEventKind::TokenRefreshed, Some(test_session()));
        }

        assert_eq!(subscription.recv().await, Err(SubscriptionError::Lagged(4)));
    }

    #[test]
    fn emit_without_subscribers_does_not_panic() {
        let events = AuthEvents::new();

        events.emit(AuthEventKind::SignedOut, None);
    }
}
