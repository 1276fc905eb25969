//! Access and refresh token management.
//!
//! [`TokenStore`] is the single holder of the token pair. It loads both
//! values from a [`TokenStorage`] backend once, serves reads from memory and
//! writes every change through to the backend.

mod file;
mod memory;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

pub use file::FileStorage;
pub use memory::MemoryStorage;
use valux_core::Result;

/// Tracing target for token store operations.
pub const TRACING_TARGET: &str = "valux_reqwest::token";

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "valux_access_token";

/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "valux_refresh_token";

/// Durable string key-value storage for tokens.
pub trait TokenStorage: Send + Sync + fmt::Debug {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Default)]
struct TokenPair {
    access: Option<String>,
    refresh: Option<String>,
}

struct TokenStoreInner {
    tokens: RwLock<TokenPair>,
    storage: Arc<dyn TokenStorage>,
}

/// Holder of the access/refresh token pair.
///
/// Clones share the same pair. The lock is never held across an `.await`.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<TokenStoreInner>,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("storage", &self.inner.storage)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Creates a store, loading both tokens from `storage`.
    pub fn new<S>(storage: S) -> Result<Self>
    where
        S: TokenStorage + 'static,
    {
        Self::from_shared(Arc::new(storage))
    }

    /// Creates a store over a shared storage backend.
    pub fn from_shared(storage: Arc<dyn TokenStorage>) -> Result<Self> {
        let tokens = TokenPair {
            access: storage.get(ACCESS_TOKEN_KEY)?,
            refresh: storage.get(REFRESH_TOKEN_KEY)?,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            has_access = tokens.access.is_some(),
            has_refresh = tokens.refresh.is_some(),
            "Loaded tokens"
        );

        let inner = TokenStoreInner {
            tokens: RwLock::new(tokens),
            storage,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Creates an empty store that only lives in memory.
    pub fn in_memory() -> Self {
        let inner = TokenStoreInner {
            tokens: RwLock::new(TokenPair::default()),
            storage: Arc::new(MemoryStorage::new()),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.read(|tokens| tokens.access.clone())
    }

    /// Returns the refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.read(|tokens| tokens.refresh.clone())
    }

    /// Returns true if an access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.read(|tokens| tokens.access.is_some())
    }

    /// Replaces both tokens.
    ///
    /// Memory is updated before storage, so a persistence failure still
    /// leaves the new pair in effect for this process.
    pub fn set(&self, access: impl Into<String>, refresh: impl Into<String>) -> Result<()> {
        let access = access.into();
        let refresh = refresh.into();

        {
            let mut tokens = self
                .inner
                .tokens
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            tokens.access = Some(access.clone());
            tokens.refresh = Some(refresh.clone());
        }

        let storage = &self.inner.storage;
        let persisted = storage
            .set(ACCESS_TOKEN_KEY, &access)
            .and_then(|()| storage.set(REFRESH_TOKEN_KEY, &refresh));

        match &persisted {
            Ok(()) => tracing::debug!(target: TRACING_TARGET, "Stored tokens"),
            Err(error) => {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Failed to persist tokens")
            }
        }

        persisted
    }

    /// Removes both tokens from memory and storage.
    pub fn clear(&self) -> Result<()> {
        {
            let mut tokens = self
                .inner
                .tokens
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *tokens = TokenPair::default();
        }

        let storage = &self.inner.storage;
        let removed = storage
            .remove(ACCESS_TOKEN_KEY)
            .and_then(|()| storage.remove(REFRESH_TOKEN_KEY));

        match &removed {
            Ok(()) => tracing::debug!(target: TRACING_TARGET, "Cleared tokens"),
            Err(error) => {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Failed to clear stored tokens")
            }
        }

        removed
    }

    fn read<T>(&self, f: impl FnOnce(&TokenPair) -> T) -> T {
        let tokens = self
            .inner
            .tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&tokens)
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
