//! An in-memory backend for tests.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::{
    auth::{Profile, Session, SignUpDetails, User, UserId},
    auth_events::{AuthEventKind, AuthEvents, AuthSubscription},
    transaction::{Transaction, TransactionData, TransactionDate, TransactionId},
};

use super::{AuthService, BackendError, ProfileStore, TransactionStore};

/// The only account that [MemoryBackend] accepts.
pub(crate) const TEST_EMAIL: &str = "foo@bar.baz";
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";
pub(crate) const TEST_USER_ID: &str = "user-1";

#[derive(Debug, Default)]
struct Tables {
    session: Option<Session>,
    transactions: Vec<Transaction>,
    profiles: Vec<Profile>,
}

/// Keeps users, profiles and transactions in memory and emits auth events like
/// the hosted backend.
#[derive(Debug, Default)]
pub(crate) struct MemoryBackend {
    tables: Mutex<Tables>,
    events: AuthEvents,
    next_id: AtomicUsize,
    /// Makes [AuthService::get_session] fail.
    pub fail_session_lookup: AtomicBool,
    /// Makes [ProfileStore::get_profile] fail.
    pub fail_profile_lookup: AtomicBool,
    /// Makes every [TransactionStore] call fail.
    pub fail_rows: AtomicBool,
}

pub(crate) fn test_user() -> User {
    User {
        id: UserId::new(TEST_USER_ID),
        email: Some(TEST_EMAIL.to_owned()),
    }
}

pub(crate) fn session_for(user: User) -> Session {
    Session {
        access_token: format!("access-{}", user.id),
        refresh_token: format!("refresh-{}", user.id),
        expires_at: i64::MAX,
        user,
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend where the test user is already signed in.
    pub fn signed_in() -> Self {
        let backend = Self::new();
        backend.lock().session = Some(session_for(test_user()));
        backend
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("Could not lock tables")
    }

    pub fn add_profile(&self, profile: Profile) {
        self.lock().profiles.push(profile);
    }

    pub fn add_transaction(&self, owner: &UserId, data: TransactionData) -> Transaction {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let transaction = Transaction {
            id: TransactionId::new(id.to_string()),
            amount: data.amount,
            date: TransactionDate::from_date(data.date),
            description: data.description,
            type_: data.type_,
            category: data.category,
            necessity: Some(data.necessity),
            owner: owner.clone(),
        };

        self.lock().transactions.push(transaction.clone());

        transaction
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    /// Replace the session and notify subscribers, as if another device had
    /// signed in.
    pub fn set_session(&self, session: Option<Session>, kind: AuthEventKind) {
        self.lock().session = session.clone();
        self.events.emit(kind, session);
    }

    fn check_rows(&self) -> Result<(), BackendError> {
        if self.fail_rows.load(Ordering::SeqCst) {
            return Err(BackendError::Rejected {
                status: 500,
                message: "the table is unavailable".to_owned(),
            });
        }

        if self.lock().session.is_none() {
            return Err(BackendError::NotSignedIn);
        }

        Ok(())
    }
}

#[async_trait]
impl AuthService for MemoryBackend {
    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        if self.fail_session_lookup.load(Ordering::SeqCst) {
            return Err(BackendError::Rejected {
                status: 503,
                message: "auth service unavailable".to_owned(),
            });
        }

        Ok(self.lock().session.clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        if email != TEST_EMAIL || password != TEST_PASSWORD {
            return Err(BackendError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_owned(),
            });
        }

        let session = session_for(test_user());
        self.set_session(Some(session.clone()), AuthEventKind::SignedIn);

        Ok(session)
    }

    async fn sign_up(&self, details: &SignUpDetails) -> Result<Option<Session>, BackendError> {
        if details.email == TEST_EMAIL {
            return Err(BackendError::Rejected {
                status: 422,
                message: "User already registered".to_owned(),
            });
        }

        let user = User {
            id: UserId::new(format!("user-{}", details.email)),
            email: Some(details.email.clone()),
        };

        self.add_profile(Profile {
            id: user.id.clone(),
            first_name: Some(details.first_name.clone()),
            last_name: Some(details.last_name.clone()),
            phone: Some(details.phone.clone()),
        });

        let session = session_for(user);
        self.set_session(Some(session.clone()), AuthEventKind::SignedIn);

        Ok(Some(session))
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.set_session(None, AuthEventKind::SignedOut);

        Ok(())
    }

    fn subscribe(&self) -> AuthSubscription {
        self.events.subscribe()
    }
}

#[async_trait]
impl TransactionStore for MemoryBackend {
    async fn list_transactions(&self, owner: &UserId) -> Result<Vec<Transaction>, BackendError> {
        self.check_rows()?;

        let mut transactions = self
            .lock()
            .transactions
            .iter()
            .filter(|transaction| &transaction.owner == owner)
            .cloned()
            .collect::<Vec<_>>();

        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(transactions)
    }

    async fn get_transaction(&self, id: &TransactionId) -> Result<Transaction, BackendError> {
        self.check_rows()?;

        self.lock()
            .transactions
            .iter()
            .find(|transaction| &transaction.id == id)
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    async fn insert_transaction(
        &self,
        owner: &UserId,
        data: &TransactionData,
    ) -> Result<Transaction, BackendError> {
        self.check_rows()?;

        Ok(self.add_transaction(owner, data.clone()))
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        data: &TransactionData,
    ) -> Result<Transaction, BackendError> {
        self.check_rows()?;

        let mut tables = self.lock();
        let transaction = tables
            .transactions
            .iter_mut()
            .find(|transaction| &transaction.id == id)
            .ok_or(BackendError::NotFound)?;

        transaction.amount = data.amount;
        transaction.date = TransactionDate::from_date(data.date);
        transaction.description = data.description.clone();
        transaction.type_ = data.type_;
        transaction.category = data.category;
        transaction.necessity = Some(data.necessity);

        Ok(transaction.clone())
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), BackendError> {
        self.check_rows()?;

        let mut tables = self.lock();
        let count_before = tables.transactions.len();
        tables.transactions.retain(|transaction| &transaction.id != id);

        if tables.transactions.len() == count_before {
            Err(BackendError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryBackend {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, BackendError> {
        if self.fail_profile_lookup.load(Ordering::SeqCst) {
            return Err(BackendError::Rejected {
                status: 500,
                message: "profiles unavailable".to_owned(),
            });
        }

        Ok(self
            .lock()
            .profiles
            .iter()
            .find(|profile| &profile.id == user_id)
            .cloned())
    }
}
