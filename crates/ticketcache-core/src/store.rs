//! On-disk persistence for session credentials.
//!
//! Each account variant gets its own JSON file in a private data directory.
//! A missing or unreadable file is treated as "nothing cached" so a damaged
//! file never blocks a fresh login.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::auth::{AccountVariant, Credential};

/// Where credentials live between runs.
pub trait TokenStore {
    /// Load the persisted credential for a variant. Never fails; a missing or
    /// corrupt record is `None`.
    fn load(&self, variant: AccountVariant) -> Option<Credential>;

    fn save(&self, variant: AccountVariant, credential: &Credential) -> Result<()>;

    fn remove(&self, variant: AccountVariant) -> Result<()>;
}

pub struct FileTokenStore {
    data_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn token_path(&self, variant: AccountVariant) -> PathBuf {
        self.data_dir.join(format!("token_{}.json", variant.as_str()))
    }

    fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory {}", self.data_dir.display())
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.data_dir, std::fs::Permissions::from_mode(0o700))
                .context("Failed to restrict data directory permissions")?;
        }
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Credential> {
        let contents = std::fs::read_to_string(path).context("Failed to read token file")?;
        serde_json::from_str(&contents).context("Failed to parse token file")
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, variant: AccountVariant) -> Option<Credential> {
        let path = self.token_path(variant);
        if !path.exists() {
            debug!(%variant, "No token file on disk");
            return None;
        }

        match self.read(&path) {
            Ok(credential) => Some(credential),
            Err(e) => {
                warn!(%variant, path = %path.display(), error = %e, "Ignoring unreadable token file");
                None
            }
        }
    }

    fn save(&self, variant: AccountVariant, credential: &Credential) -> Result<()> {
        self.ensure_dir()?;

        let path = self.token_path(variant);
        let tmp_path = path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(credential)?;
        std::fs::write(&tmp_path, contents).context("Failed to write token file")?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
                .context("Failed to restrict token file permissions")?;
        }
        std::fs::rename(&tmp_path, &path).context("Failed to replace token file")?;

        debug!(%variant, path = %path.display(), "Token saved");
        Ok(())
    }

    fn remove(&self, variant: AccountVariant) -> Result<()> {
        let path = self.token_path(variant);
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, SubsecRound, Utc};

    fn sample() -> Credential {
        let now = Utc::now().trunc_subsecs(0);
        Credential {
            token: "ticket-abc".to_string(),
            session_id: "session-123".to_string(),
            expiration: Some(now + Duration::hours(3)),
            obtained_at: now,
            profile_id: Some("profile-1".to_string()),
            user_id: None,
        }
    }

    #[test]
    fn test_save_then_load_reproduces_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens"));
        let credential = sample();

        store.save(AccountVariant::Primary, &credential).unwrap();
        let loaded = store.load(AccountVariant::Primary).unwrap();

        assert_eq!(loaded.token, credential.token);
        assert_eq!(loaded.session_id, credential.session_id);
        assert_eq!(loaded.expiration, credential.expiration);
        assert_eq!(loaded, credential);
    }

    #[test]
    fn test_variants_use_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.save(AccountVariant::Alternate, &sample()).unwrap();

        assert!(store.load(AccountVariant::Primary).is_none());
        assert!(store.load(AccountVariant::Alternate).is_some());
        assert_ne!(
            store.token_path(AccountVariant::Primary),
            store.token_path(AccountVariant::Alternate)
        );
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("never-created"));
        assert!(store.load(AccountVariant::Primary).is_none());
    }

    #[test]
    fn test_corrupt_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        std::fs::write(store.token_path(AccountVariant::Primary), "{\"token\": 12").unwrap();

        assert!(store.load(AccountVariant::Primary).is_none());
    }

    #[test]
    fn test_save_overwrites_previous() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        let mut first = sample();
        store.save(AccountVariant::Primary, &first).unwrap();
        first.token = "ticket-new".to_string();
        store.save(AccountVariant::Primary, &first).unwrap();

        let loaded = store.load(AccountVariant::Primary).unwrap();
        assert_eq!(loaded.token, "ticket-new");
        assert!(!store
            .token_path(AccountVariant::Primary)
            .with_extension("json.tmp")
            .exists());
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.save(AccountVariant::Primary, &sample()).unwrap();
        store.remove(AccountVariant::Primary).unwrap();
        assert!(store.load(AccountVariant::Primary).is_none());

        // Removing again is fine
        store.remove(AccountVariant::Primary).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens"));
        store.save(AccountVariant::Primary, &sample()).unwrap();

        let mode = std::fs::metadata(store.token_path(AccountVariant::Primary))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
