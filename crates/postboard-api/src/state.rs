//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/policy/token traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use postboard_core::auth::OwnershipPolicy;
use postboard_core::service::contact::ContactService;
use postboard_core::service::post::PostService;
use postboard_core::service::user::UserService;
use postboard_infra::config::{database_url, load_global_config};
use postboard_infra::crypto::hash::Sha256TokenIssuer;
use postboard_infra::sqlite::contact::SqliteContactRepository;
use postboard_infra::sqlite::pool::DatabasePool;
use postboard_infra::sqlite::post::SqlitePostRepository;
use postboard_infra::sqlite::user::SqliteUserRepository;
use postboard_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcretePolicy = OwnershipPolicy<SqlitePostRepository>;

pub type ConcretePostService = PostService<SqlitePostRepository, ConcretePolicy>;

pub type ConcreteContactService = ContactService<SqliteContactRepository, ConcretePolicy>;

pub type ConcreteUserService = UserService<SqliteUserRepository, Sha256TokenIssuer>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub post_service: Arc<ConcretePostService>,
    pub contact_service: Arc<ConcreteContactService>,
    pub user_service: Arc<ConcreteUserService>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: read config, connect to DB, wire services.
    pub async fn init(data_dir: PathBuf) -> anyhow::Result<Self> {
        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        Ok(Self::with_pool(db_pool, data_dir, config))
    }

    /// Wire services over an already-open pool.
    pub fn with_pool(db_pool: DatabasePool, data_dir: PathBuf, config: GlobalConfig) -> Self {
        let posts = SqlitePostRepository::new(db_pool.clone());

        let post_service = PostService::new(posts.clone(), OwnershipPolicy::new(posts.clone()));
        let contact_service = ContactService::new(
            SqliteContactRepository::new(db_pool.clone()),
            OwnershipPolicy::new(posts),
        );
        let user_service = UserService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Sha256TokenIssuer::new(),
        );

        Self {
            post_service: Arc::new(post_service),
            contact_service: Arc::new(contact_service),
            user_service: Arc::new(user_service),
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }
}
