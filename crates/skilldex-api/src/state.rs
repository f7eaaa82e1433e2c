//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI
//! commands and HTTP handlers. The submission router is generic over
//! repository and collaborator traits, but AppState pins it to the
//! concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use skilldex_core::directory::relation::RelationStore;
use skilldex_core::directory::resolver::SkillResolver;
use skilldex_core::directory::router::SubmissionRouter;
use skilldex_infra::config::{SlackSettings, load_global_config, resolve_data_dir};
use skilldex_infra::slack::SlackClient;
use skilldex_infra::sqlite::member::SqliteMemberRepository;
use skilldex_infra::sqlite::pool::DatabasePool;
use skilldex_infra::sqlite::skill::SqliteSkillRepository;
use skilldex_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteSubmissionRouter =
    SubmissionRouter<SqliteSkillRepository, SqliteMemberRepository, SlackClient>;

pub type ConcreteRelationStore = RelationStore<SqliteMemberRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ConcreteSubmissionRouter>,
    /// Relation reads for modal pre-selection (the router owns its own copy).
    pub relations: Arc<ConcreteRelationStore>,
    /// Direct repository handles for modal options and status reporting.
    pub skill_repo: Arc<SqliteSkillRepository>,
    pub member_repo: Arc<SqliteMemberRepository>,
    pub slack: SlackClient,
    pub settings: SlackSettings,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let settings = SlackSettings::from_env()?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("skilldex.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let slack = SlackClient::new(settings.bot_token.clone());

        // Wire the submission router with its own repository instances
        let router = SubmissionRouter::new(
            SkillResolver::new(SqliteSkillRepository::new(db_pool.clone())),
            RelationStore::new(SqliteMemberRepository::new(db_pool.clone())),
            slack.clone(),
        );

        Ok(Self {
            router: Arc::new(router),
            relations: Arc::new(RelationStore::new(SqliteMemberRepository::new(
                db_pool.clone(),
            ))),
            skill_repo: Arc::new(SqliteSkillRepository::new(db_pool.clone())),
            member_repo: Arc::new(SqliteMemberRepository::new(db_pool.clone())),
            slack,
            settings,
            config,
            data_dir,
            db_pool,
        })
    }
}
