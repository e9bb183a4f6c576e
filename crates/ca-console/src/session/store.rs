//! Persisted bearer tokens, one slot per role.
//!
//! Every read and write of a session token goes through [`SessionStore`], so
//! an invalidation by one consumer is observed by all others.

use super::Role;
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key-value storage for role tokens
pub trait SessionStore: Send + Sync {
    /// Raw token for the role, if one is stored
    fn get(&self, role: Role) -> Option<String>;

    /// Store the role's token, replacing any previous one
    fn set(&self, role: Role, token: &str) -> Result<()>;

    /// Remove the role's token; clearing an empty slot is not an error
    fn clear(&self, role: Role) -> Result<()>;
}

/// Process-local store, used by tests and embedders that persist elsewhere
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: RwLock<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token for `role`
    pub fn with_token(role: Role, token: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .tokens
            .write()
            .insert(role.storage_key().to_string(), token.into());
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, role: Role) -> Option<String> {
        self.tokens.read().get(role.storage_key()).cloned()
    }

    fn set(&self, role: Role, token: &str) -> Result<()> {
        self.tokens
            .write()
            .insert(role.storage_key().to_string(), token.to_string());
        Ok(())
    }

    fn clear(&self, role: Role) -> Result<()> {
        self.tokens.write().remove(role.storage_key());
        Ok(())
    }
}

/// JSON file store mapping storage keys to raw tokens
///
/// The file is read once on open; every write replaces it in full via an
/// owner-only temp file renamed into place.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    tokens: RwLock<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tokens = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(tokens) => tokens,
                Err(e) => {
                    warn!(?path, error = %e, "Session file is corrupt, starting with no sessions");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(?path, entries = tokens.len(), "Opened session store");
        Ok(Self {
            path,
            tokens: RwLock::new(tokens),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `tokens` to a sibling temp file and rename it over the store
    fn persist(&self, tokens: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut tmp_path = self.path.as_os_str().to_owned();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        let written = write_private(&tmp_path, &serde_json::to_vec_pretty(tokens)?)
            .and_then(|()| std::fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Create or truncate `path` readable by the owner only, then write `content`
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // A leftover temp file keeps its old mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(content)?;
    file.sync_all()
}

impl SessionStore for FileSessionStore {
    fn get(&self, role: Role) -> Option<String> {
        self.tokens.read().get(role.storage_key()).cloned()
    }

    fn set(&self, role: Role, token: &str) -> Result<()> {
        let mut tokens = self.tokens.write();
        let mut updated = tokens.clone();
        updated.insert(role.storage_key().to_string(), token.to_string());
        // Memory only changes once the file is in place
        self.persist(&updated)?;
        *tokens = updated;
        Ok(())
    }

    fn clear(&self, role: Role) -> Result<()> {
        let mut tokens = self.tokens.write();
        if !tokens.contains_key(role.storage_key()) {
            return Ok(());
        }
        let mut updated = tokens.clone();
        updated.remove(role.storage_key());
        self.persist(&updated)?;
        *tokens = updated;
        Ok(())
    }
}
