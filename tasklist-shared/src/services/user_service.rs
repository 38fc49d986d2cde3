/// User flows: signup, find-or-create and email-only authentication
///
/// Emails are trimmed before any lookup or insert. There is no password: a
/// known email is enough to obtain a token.

use std::sync::Arc;

use tracing::{debug, info};

use super::{ServiceError, ServiceResult};
use crate::models::user::User;
use crate::store::{StoreError, UserRepository};

/// User use cases
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

fn normalize_email(email: &str) -> ServiceResult<&str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ServiceError::Validation("Email is required".to_string()));
    }
    Ok(email)
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Looks a user up by email
    pub async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let email = normalize_email(email)?;
        Ok(self.users.find_by_email(email).await?)
    }

    /// Looks a user up by ID
    pub async fn find_by_id(&self, id: &str) -> ServiceResult<Option<User>> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// - `Validation` if the email is blank
    /// - `Conflict` (with the existing user) if the email is taken
    pub async fn create_user(&self, email: &str) -> ServiceResult<User> {
        let email = normalize_email(email)?;

        if let Some(existing) = self.users.find_by_email(email).await? {
            return Err(conflict(existing));
        }

        match self.users.create(User::new(email)).await {
            Ok(user) => {
                info!(user_id = %user.id, "User created");
                Ok(user)
            }
            Err(StoreError::DuplicateEmail(_)) => match self.users.find_by_email(email).await? {
                Some(existing) => Err(conflict(existing)),
                None => Err(vanished_after_duplicate(email)),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the user for `email`, creating it on first sight
    ///
    /// The boolean is `true` only when this call inserted the user. Losing an
    /// insert race to a concurrent call yields the winner with `false`.
    pub async fn find_or_create(&self, email: &str) -> ServiceResult<(User, bool)> {
        let email = normalize_email(email)?;

        if let Some(existing) = self.users.find_by_email(email).await? {
            debug!(user_id = %existing.id, "Found existing user");
            return Ok((existing, false));
        }

        match self.users.create(User::new(email)).await {
            Ok(user) => {
                info!(user_id = %user.id, "User created");
                Ok((user, true))
            }
            Err(StoreError::DuplicateEmail(_)) => self
                .users
                .find_by_email(email)
                .await?
                .map(|user| (user, false))
                .ok_or_else(|| vanished_after_duplicate(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves an email to its user for token issuance
    ///
    /// # Errors
    ///
    /// `NotFound` if no user has this email
    pub async fn authenticate(&self, email: &str) -> ServiceResult<User> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }
}

/// Users are never deleted, so a duplicate-email insert always has a winner
/// to re-read
fn vanished_after_duplicate(email: &str) -> ServiceError {
    ServiceError::Internal(format!(
        "User with email {} rejected as duplicate but not found on re-read",
        email
    ))
}

fn conflict(existing: User) -> ServiceError {
    ServiceError::Conflict {
        message: "User with this email already exists".to_string(),
        user: existing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn service() -> UserService {
        UserService::new(Store::memory().users)
    }

    #[tokio::test]
    async fn test_create_user_trims_email() {
        let service = service();

        let user = service.create_user("  alice@example.com ").await.unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_eq!(
            service.find_by_id(&user.id).await.unwrap(),
            Some(user)
        );
    }

    #[tokio::test]
    async fn test_create_user_rejects_blank_email() {
        let result = service().create_user("   ").await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_signup_returns_existing_user() {
        let service = service();
        let first = service.create_user("dup@example.com").await.unwrap();

        match service.create_user("dup@example.com").await {
            Err(ServiceError::Conflict { user, .. }) => assert_eq!(user, first),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_signup_creates_one_user() {
        let service = service();

        let (a, b) = tokio::join!(
            service.create_user("race@example.com"),
            service.create_user("race@example.com")
        );

        let (winner, loser) = match (a, b) {
            (Ok(user), Err(err)) | (Err(err), Ok(user)) => (user, err),
            other => panic!("expected exactly one signup to succeed, got {:?}", other),
        };

        match loser {
            ServiceError::Conflict { user, .. } => assert_eq!(user, winner),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    /// Wraps a repository and hides existing users from the first
    /// `hidden_lookups` email lookups, as if another request inserted them
    /// between our check and our insert
    struct StaleLookups {
        inner: Arc<dyn UserRepository>,
        hidden_lookups: std::sync::atomic::AtomicUsize,
    }

    impl StaleLookups {
        fn new(inner: Arc<dyn UserRepository>, hidden_lookups: usize) -> Arc<Self> {
            Arc::new(Self {
                inner,
                hidden_lookups: hidden_lookups.into(),
            })
        }
    }

    #[async_trait::async_trait]
    impl UserRepository for StaleLookups {
        async fn find_by_id(&self, id: &str) -> crate::store::StoreResult<Option<User>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_email(&self, email: &str) -> crate::store::StoreResult<Option<User>> {
            use std::sync::atomic::Ordering;

            let hide = self
                .hidden_lookups
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if hide {
                return Ok(None);
            }
            self.inner.find_by_email(email).await
        }

        async fn create(&self, user: User) -> crate::store::StoreResult<User> {
            self.inner.create(user).await
        }

        async fn ping(&self) -> crate::store::StoreResult<()> {
            self.inner.ping().await
        }
    }

    #[tokio::test]
    async fn test_signup_losing_insert_race_conflicts_with_winner() {
        let store = Store::memory();
        let winner = store.users.create(User::new("late@example.com")).await.unwrap();
        let service = UserService::new(StaleLookups::new(store.users.clone(), 1));

        match service.create_user("late@example.com").await {
            Err(ServiceError::Conflict { user, .. }) => assert_eq!(user, winner),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_or_create_losing_insert_race_returns_winner() {
        let store = Store::memory();
        let winner = store.users.create(User::new("late@example.com")).await.unwrap();
        let service = UserService::new(StaleLookups::new(store.users.clone(), 1));

        let (user, created) = service.find_or_create("late@example.com").await.unwrap();

        assert_eq!(user, winner);
        assert!(!created);
    }

    #[tokio::test]
    async fn test_duplicate_without_winner_is_internal() {
        let store = Store::memory();
        store.users.create(User::new("ghost@example.com")).await.unwrap();
        let service = UserService::new(StaleLookups::new(store.users.clone(), usize::MAX));

        assert!(matches!(
            service.create_user("ghost@example.com").await,
            Err(ServiceError::Internal(_))
        ));
        assert!(matches!(
            service.find_or_create("ghost@example.com").await,
            Err(ServiceError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_find_or_create_reports_creation_once() {
        let service = service();

        let (created, is_new) = service.find_or_create("new@example.com").await.unwrap();
        let (found, is_new_again) = service.find_or_create("new@example.com").await.unwrap();

        assert!(is_new);
        assert!(!is_new_again);
        assert_eq!(created, found);
    }

    #[tokio::test]
    async fn test_concurrent_find_or_create_creates_one_user() {
        let service = service();

        let (a, b) = tokio::join!(
            service.find_or_create("race@example.com"),
            service.find_or_create("race@example.com")
        );
        let (a, a_new) = a.unwrap();
        let (b, b_new) = b.unwrap();

        assert_eq!(a.id, b.id);
        assert!(a_new ^ b_new);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let service = service();
        service.create_user("known@example.com").await.unwrap();

        assert!(service.authenticate("known@example.com").await.is_ok());
        assert!(matches!(
            service.authenticate("unknown@example.com").await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
