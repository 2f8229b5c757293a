//! Application state shared across handlers.
//!
//! This is the explicit application context: the auth and cart stores, the
//! catalog client, and the login service are reached through [`AppState`],
//! never through ambient singletons.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::services::LoginService;
use crate::storage::{FileStore, KvStore, PersistenceError};
use crate::stores::{AuthStore, CartStore};

/// Error initializing the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("failed to open state directory: {0}")]
    Storage(#[from] PersistenceError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// stores, the catalog client, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    login: LoginService,
    auth: AuthStore,
    cart: CartStore,
}

impl AppState {
    /// Create the application state with file-backed session persistence
    /// under the configured state directory, restoring any persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateInitError> {
        let storage: Arc<dyn KvStore> = Arc::new(FileStore::new(&config.state_dir)?);
        Ok(Self::with_storage(config, storage))
    }

    /// Create the application state over an explicit storage backend.
    ///
    /// Used by tests (with `MemoryStore`) and by embedders that bring their
    /// own persistence medium.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn KvStore>) -> Self {
        let catalog = CatalogClient::new(&config.catalog_api_url);
        let login = LoginService::new(config.auth.clone());
        let auth = AuthStore::restore(storage);
        let cart = CartStore::new();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                login,
                auth,
                cart,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the login service.
    #[must_use]
    pub fn login(&self) -> &LoginService {
        &self.inner.login
    }

    /// Get a reference to the auth state store.
    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.inner.auth
    }

    /// Get a reference to the cart state store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
