use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{DbPool, OrmConn};
use crate::storage::BlobStore;
use crate::sync::ChangeHub;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: AppConfig,
    pub store: Arc<dyn BlobStore>,
    pub changes: ChangeHub,
}
