//! Application state wiring the pipeline and its adapters together.
//!
//! The pipeline is generic over the store/gateway ports; AppState pins it to
//! the concrete infra implementations (SQLite + FCM).

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use tracing::warn;

use chatping_core::notify::NotificationPipeline;
use chatping_infra::config::{load_service_config, resolve_data_dir};
use chatping_infra::fcm::FcmGateway;
use chatping_infra::ingress::IngressAuth;
use chatping_infra::sqlite::{DatabasePool, SqliteProfileStore};
use chatping_types::config::ServiceConfig;

/// Environment variable holding the push gateway server key.
pub const FCM_KEY_ENV: &str = "CHATPING_FCM_KEY";

/// Concrete type alias for the pipeline pinned to infra implementations.
pub type ConcretePipeline = NotificationPipeline<SqliteProfileStore, FcmGateway>;

/// Shared application state used by CLI commands and REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ConcretePipeline>,
    /// Store instance for the profile/token management API. The pipeline
    /// owns its own instance over the same pool.
    pub profile_store: Arc<SqliteProfileStore>,
    pub ingress_auth: IngressAuth,
    pub config: ServiceConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the DB, load config,
    /// wire the pipeline.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("chatping.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let config = load_service_config(&data_dir).await;

        // The gateway authenticates with the server key from the
        // environment. Without it, sends fail at the gateway and are logged;
        // the pipeline contract is best-effort either way.
        let server_key = match std::env::var(FCM_KEY_ENV) {
            Ok(key) => SecretString::from(key),
            Err(_) => {
                warn!("{FCM_KEY_ENV} is not set; push sends will be rejected by the gateway");
                SecretString::from("")
            }
        };
        let gateway = FcmGateway::new(server_key, &config.push);

        let pipeline = NotificationPipeline::new(
            SqliteProfileStore::new(db_pool.clone()),
            gateway,
            config.naming.clone(),
        );

        let ingress_auth = IngressAuth::from_config(&config.ingress);

        Ok(Self {
            pipeline: Arc::new(pipeline),
            profile_store: Arc::new(SqliteProfileStore::new(db_pool.clone())),
            ingress_auth,
            config,
            data_dir,
            db_pool,
        })
    }
}
