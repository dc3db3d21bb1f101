use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::{entities::UserRecord, error::DomainError, users::NewUser};

use super::repos::{RepoError, UsersRepo};

pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const MAX_LIST_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UsersRepo>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UsersRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<UserRecord>, UserServiceError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        Ok(self.repo.list_users(limit).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<UserRecord, UserServiceError> {
        self.repo
            .find_user(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user").into())
    }

    pub async fn create(
        &self,
        username: &str,
        email: &str,
    ) -> Result<UserRecord, UserServiceError> {
        let new_user = NewUser::parse(username, email)?;
        let user = self.repo.create_user(new_user).await?;
        info!(
            target: "hitcount::users",
            user_id = %user.id,
            username = %user.username,
            "user created"
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::*;

    #[derive(Default)]
    struct MemoryUsers {
        users: Mutex<Vec<UserRecord>>,
        last_limit: Mutex<Option<u32>>,
    }

    #[async_trait]
    impl UsersRepo for MemoryUsers {
        async fn list_users(&self, limit: u32) -> Result<Vec<UserRecord>, RepoError> {
            *self.last_limit.lock().unwrap() = Some(limit);
            Ok(self.users.lock().unwrap().clone())
        }

        async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|user| user.id == id)
                .cloned())
        }

        async fn create_user(&self, user: NewUser) -> Result<UserRecord, RepoError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.username == user.username) {
                return Err(RepoError::Duplicate {
                    constraint: "users_username_key".to_string(),
                });
            }
            let record = UserRecord {
                id: Uuid::new_v4(),
                username: user.username,
                email: user.email,
                created_at: OffsetDateTime::now_utc(),
            };
            users.push(record.clone());
            Ok(record)
        }
    }

    #[tokio::test]
    async fn list_limit_is_clamped() {
        let repo = Arc::new(MemoryUsers::default());
        let service = UserService::new(repo.clone());

        service.list(Some(0)).await.expect("list");
        assert_eq!(*repo.last_limit.lock().unwrap(), Some(1));

        service.list(Some(10_000)).await.expect("list");
        assert_eq!(*repo.last_limit.lock().unwrap(), Some(MAX_LIST_LIMIT));

        service.list(None).await.expect("list");
        assert_eq!(*repo.last_limit.lock().unwrap(), Some(DEFAULT_LIST_LIMIT));
    }

    #[tokio::test]
    async fn create_validates_before_touching_the_store() {
        let repo = Arc::new(MemoryUsers::default());
        let service = UserService::new(repo.clone());

        let err = service.create("x", "x@example.org").await.unwrap_err();
        assert!(matches!(err, UserServiceError::Domain(_)));
        assert!(repo.users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_username_surfaces_repo_error() {
        let service = UserService::new(Arc::new(MemoryUsers::default()));
        service.create("grace", "grace@example.org").await.expect("first");

        let err = service
            .create("grace", "other@example.org")
            .await
            .unwrap_err();
        assert!(matches!(err, UserServiceError::Repo(RepoError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let service = UserService::new(Arc::new(MemoryUsers::default()));
        let err = service.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(
            err,
            UserServiceError::Domain(DomainError::NotFound { entity: "user" })
        ));
    }
}
