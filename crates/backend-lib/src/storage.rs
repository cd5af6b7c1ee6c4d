// ============================
// sabha-backend-lib/src/storage.rs
// ============================
//! Storage abstraction with flat-file implementation.
//!
//! One JSON document per user, keyed by user id. Email lookup and type
//! listing scan the directory; fine at the platform's expected scale.
use crate::error::AppError;
use async_trait::async_trait;
use sabha_common::UserRecord;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tokio::fs as tokio_fs;

/// Trait for user-document storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store a new user; fails with [`AppError::DuplicateEmail`] if the email
    /// is already registered.
    async fn create_user(&self, user: &UserRecord) -> Result<(), AppError>;

    /// Load a user by id
    async fn load_user(&self, id: &str) -> Result<UserRecord, AppError>;

    /// Look up a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Persist the full document for an existing user
    async fn save_user(&self, user: &UserRecord) -> Result<(), AppError>;

    /// List all users with the given user type
    async fn list_by_type(&self, user_type: &str) -> Result<Vec<UserRecord>, AppError>;

    /// Directory for a user's uploaded files of one kind
    /// (e.g. `profilePhoto`, `businessLogo`, `files`)
    fn upload_dir(&self, email: &str, kind: &str) -> PathBuf;

    /// Root of the uploads tree, for static serving
    fn uploads_root(&self) -> PathBuf;
}

/// Flat-file implementation of the Storage trait
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("users"))?;
        fs::create_dir_all(root.join("uploads"))?;
        Ok(Self { root })
    }

    fn user_path(&self, id: &str) -> PathBuf {
        self.root.join("users").join(format!("{id}.json"))
    }

    async fn scan_users<F>(&self, mut keep: F) -> Result<Vec<UserRecord>, AppError>
    where
        F: FnMut(&UserRecord) -> bool,
    {
        let mut out = Vec::new();
        let mut entries = tokio_fs::read_dir(self.root.join("users")).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let content = tokio_fs::read_to_string(entry.path()).await?;
            let user: UserRecord = serde_json::from_str(&content)?;
            if keep(&user) {
                out.push(user);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn create_user(&self, user: &UserRecord) -> Result<(), AppError> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }
        self.save_user(user).await
    }

    async fn load_user(&self, id: &str) -> Result<UserRecord, AppError> {
        let path = self.user_path(id);
        if !path.exists() {
            return Err(AppError::UserNotFound);
        }
        let content = tokio_fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let mut matches = self.scan_users(|u| u.email == email).await?;
        Ok(matches.pop())
    }

    async fn save_user(&self, user: &UserRecord) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(user)?;
        tokio_fs::write(self.user_path(&user.id), json).await?;
        Ok(())
    }

    async fn list_by_type(&self, user_type: &str) -> Result<Vec<UserRecord>, AppError> {
        self.scan_users(|u| u.user_type == user_type).await
    }

    fn upload_dir(&self, email: &str, kind: &str) -> PathBuf {
        self.root.join("uploads").join(email).join(kind)
    }

    fn uploads_root(&self) -> PathBuf {
        self.root.join("uploads")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(email: &str, user_type: &str) -> UserRecord {
        UserRecord::new(
            email.to_string(),
            "hash".to_string(),
            user_type.to_string(),
            "Name".to_string(),
            "123".to_string(),
            "female".to_string(),
            "en-IN".to_string(),
        )
    }

    async fn setup() -> (FlatFileStorage, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = FlatFileStorage::new(dir.path()).unwrap();
        (storage, dir)
    }

    #[tokio::test]
    async fn test_create_and_load_roundtrip() {
        let (storage, _dir) = setup().await;
        let user = sample("a@example.com", "merchant");
        storage.create_user(&user).await.unwrap();

        let loaded = storage.load_user(&user.id).await.unwrap();
        assert_eq!(loaded.email, "a@example.com");
        assert_eq!(loaded.user_type, "merchant");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let (storage, _dir) = setup().await;
        storage
            .create_user(&sample("a@example.com", "merchant"))
            .await
            .unwrap();
        let err = storage
            .create_user(&sample("a@example.com", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_load_missing_user() {
        let (storage, _dir) = setup().await;
        let err = storage.load_user("nope").await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let (storage, _dir) = setup().await;
        let user = sample("find-me@example.com", "user");
        storage.create_user(&user).await.unwrap();

        let found = storage.find_by_email("find-me@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);
        assert!(storage
            .find_by_email("absent@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_save_updates_document() {
        let (storage, _dir) = setup().await;
        let mut user = sample("a@example.com", "merchant");
        storage.create_user(&user).await.unwrap();

        user.profile.business_name = Some("Clinic".to_string());
        storage.save_user(&user).await.unwrap();

        let loaded = storage.load_user(&user.id).await.unwrap();
        assert_eq!(loaded.profile.business_name.as_deref(), Some("Clinic"));
    }

    #[tokio::test]
    async fn test_list_by_type() {
        let (storage, _dir) = setup().await;
        storage
            .create_user(&sample("m1@example.com", "merchant"))
            .await
            .unwrap();
        storage
            .create_user(&sample("m2@example.com", "merchant"))
            .await
            .unwrap();
        storage
            .create_user(&sample("u1@example.com", "user"))
            .await
            .unwrap();

        let merchants = storage.list_by_type("merchant").await.unwrap();
        assert_eq!(merchants.len(), 2);
        let admins = storage.list_by_type("admin").await.unwrap();
        assert!(admins.is_empty());
    }
}
