use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    auth::Session,
    auth_events::{AuthSubscription, SubscriptionError},
    backend::{AuthService, ProfileStore},
};

use super::SessionState;

/// The state channel and the guard that stops writes after teardown.
#[derive(Debug)]
struct Shared {
    state: watch::Sender<SessionState>,
    mounted: AtomicBool,
}

impl Shared {
    /// Apply `change` to the state unless the provider has been torn down.
    ///
    /// Returns whether the change was applied. The mounted flag is checked
    /// while holding the channel's lock, which [SessionProvider::teardown]
    /// also takes, so no write can land after teardown returns.
    fn update(&self, change: impl FnOnce(&mut SessionState)) -> bool {
        let mut applied = false;

        self.state.send_if_modified(|state| {
            if !self.mounted.load(Ordering::SeqCst) {
                return false;
            }

            let before = state.clone();
            change(state);
            applied = true;

            *state != before
        });

        applied
    }
}

/// Tracks the signed-in user and their profile for the whole process.
#[derive(Debug)]
pub struct SessionProvider {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionProvider {
    /// Start tracking the session held by `auth`.
    ///
    /// The state is loading until the existing session has been looked up.
    /// Must be called from within a tokio runtime.
    pub fn mount(auth: Arc<dyn AuthService>, profiles: Arc<dyn ProfileStore>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let shared = Arc::new(Shared {
            state,
            mounted: AtomicBool::new(true),
        });

        // Subscribe before the lookup so that a sign in that happens while
        // the lookup is in flight is still seen.
        let subscription = auth.subscribe();
        let task = tokio::spawn(follow_auth_events(
            shared.clone(),
            auth,
            profiles,
            subscription,
        ));

        Self {
            shared,
            task: Mutex::new(Some(task)),
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    /// A receiver that is notified every time the state changes.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    /// Wait until `predicate` holds for the state, for at most `timeout`.
    ///
    /// Returns the first state that satisfies `predicate`, or `None` on
    /// timeout.
    pub async fn wait_until(
        &self,
        predicate: impl Fn(&SessionState) -> bool,
        timeout: Duration,
    ) -> Option<SessionState> {
        let mut receiver = self.watch();

        match tokio::time::timeout(timeout, receiver.wait_for(|state| predicate(state))).await {
            Ok(Ok(state)) => Some(state.clone()),
            Ok(Err(_)) => None,
            Err(_) => {
                tracing::debug!("Timed out after {timeout:?} waiting for the session state");
                None
            }
        }
    }

    /// Whether [SessionProvider::teardown] has not been called yet.
    pub fn is_mounted(&self) -> bool {
        self.shared.mounted.load(Ordering::SeqCst)
    }

    /// Stop tracking the session.
    ///
    /// The state keeps its last value. Results that arrive afterwards, e.g. a
    /// profile fetch that was in flight, are discarded.
    pub fn teardown(&self) {
        self.shared.state.send_if_modified(|_| {
            self.shared.mounted.store(false, Ordering::SeqCst);
            false
        });

        let task = match self.task.lock() {
            Ok(mut task) => task.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(task) = task {
            task.abort();
            tracing::debug!("Session provider torn down");
        }
    }
}

impl Drop for SessionProvider {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn follow_auth_events(
    shared: Arc<Shared>,
    auth: Arc<dyn AuthService>,
    profiles: Arc<dyn ProfileStore>,
    mut subscription: AuthSubscription,
) {
    resolve(&shared, profiles.as_ref(), lookup_session(auth.as_ref()).await).await;

    loop {
        match subscription.recv().await {
            Ok(event) => {
                tracing::debug!("Received auth event {:?}", event.kind);
                resolve(&shared, profiles.as_ref(), event.session).await;
            }
            Err(SubscriptionError::Lagged(skipped)) => {
                tracing::warn!("Missed {skipped} auth events, looking up the session again");
                resolve(&shared, profiles.as_ref(), lookup_session(auth.as_ref()).await).await;
            }
            Err(SubscriptionError::Closed) => {
                tracing::debug!("Auth events closed, no longer following the session");
                break;
            }
        }
    }
}

async fn lookup_session(auth: &dyn AuthService) -> Option<Session> {
    match auth.get_session().await {
        Ok(session) => session,
        Err(error) => {
            tracing::error!("Could not look up the current session: {error}");
            None
        }
    }
}

/// Publish `session` and then fetch the profile of its user.
///
/// While the profile is fetched `profile_pending` is set, and on the first
/// lookup `loading` stays set until the fetch has finished.
async fn resolve(shared: &Shared, profiles: &dyn ProfileStore, session: Option<Session>) {
    let user = session.as_ref().map(|session| session.user.clone());

    let applied = shared.update(|state| {
        let same_user = state.user.as_ref().map(|user| &user.id)
            == user.as_ref().map(|user| &user.id);

        // A profile must never be shown next to another user.
        if !same_user {
            state.profile = None;
        }

        state.user = user.clone();
        state.session = session;
        state.profile_pending = user.is_some();

        if user.is_none() {
            state.loading = false;
        }
    });

    let Some(user) = user.filter(|_| applied) else {
        return;
    };

    let profile = match profiles.get_profile(&user.id).await {
        Ok(profile) => Some(profile),
        Err(error) => {
            tracing::warn!("Could not fetch the profile for user {}: {error}", user.id);
            None
        }
    };

    shared.update(|state| {
        if state.user.as_ref().map(|current| &current.id) != Some(&user.id) {
            return;
        }

        if let Some(profile) = profile {
            state.profile = profile;
        }

        state.profile_pending = false;
        state.loading = false;
    });
}
