//! Per-user profile: captured display name and last-seen time, keyed by PSID.
//!
//! Profiles live for the process lifetime. The [`ProfileStore`] trait is the lookup/update
//! contract the responder uses; [`MemoryProfileStore`] is the in-process implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Platform-scoped user id.
pub type Psid = String;

/// Name used when the user skips name capture.
pub const PLACEHOLDER_NAME: &str = "প্রিয়";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: Option<String>,
    pub last_seen: DateTime<Utc>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self {
            name: None,
            last_seen: Utc::now(),
        }
    }

    /// Name to address the user by: the captured one or the placeholder.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(PLACEHOLDER_NAME)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Return the profile for `psid`, creating a fresh one if none exists.
    async fn get_or_create(&self, psid: &str) -> Result<UserProfile, ProfileError>;
    /// Set the captured name. Creates the profile if needed.
    async fn set_name(&self, psid: &str, name: &str) -> Result<(), ProfileError>;
    /// Mark the user as seen now. Creates the profile if needed.
    async fn touch(&self, psid: &str) -> Result<(), ProfileError>;
}

/// In-memory store. Clones share the same map.
#[derive(Clone)]
pub struct MemoryProfileStore {
    inner: Arc<RwLock<HashMap<Psid, UserProfile>>>,
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Return a clone of the profile if it exists, without creating one.
    pub async fn get(&self, psid: &str) -> Option<UserProfile> {
        self.inner.read().await.get(psid).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_or_create(&self, psid: &str) -> Result<UserProfile, ProfileError> {
        if let Some(p) = self.inner.read().await.get(psid) {
            return Ok(p.clone());
        }
        let mut g = self.inner.write().await;
        Ok(g.entry(psid.to_string()).or_default().clone())
    }

    async fn set_name(&self, psid: &str, name: &str) -> Result<(), ProfileError> {
        let mut g = self.inner.write().await;
        g.entry(psid.to_string()).or_default().name = Some(name.to_string());
        Ok(())
    }

    async fn touch(&self, psid: &str) -> Result<(), ProfileError> {
        let mut g = self.inner.write().await;
        g.entry(psid.to_string()).or_default().last_seen = Utc::now();
        Ok(())
    }
}
