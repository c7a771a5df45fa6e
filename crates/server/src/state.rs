use std::sync::Arc;

use configs::AppConfig;
use service::errors::ServiceError;
use service::users::{offset_from_secs, service::UsersCache, UsersService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: UsersService,
    /// Largest accepted `/image` upload, in bytes.
    pub image_body_limit: usize,
}

impl AppState {
    /// Build state with a fresh, empty result cache.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, ServiceError> {
        let offset = offset_from_secs(cfg.users.utc_offset_secs)?;
        let cache = Arc::new(UsersCache::new());
        Ok(Self {
            users: UsersService::new(cache, offset, cfg.users.cache_capacity),
            image_body_limit: cfg.images.max_body_bytes,
        })
    }
}
