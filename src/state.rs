use std::sync::Arc;

use crate::config::AppConfig;
use crate::db;
use crate::users::{
    repo::{PoolExecutor, StatementExecutor},
    UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config.database).await?;
        let executor = Arc::new(PoolExecutor::new(pool)) as Arc<dyn StatementExecutor>;

        let users = UserService::new(executor).with_deadline(config.database.statement_timeout);
        Ok(Self::from_parts(users))
    }

    pub fn from_parts(users: UserService) -> Self {
        Self {
            users: Arc::new(users),
        }
    }

    pub fn with_executor(executor: Arc<dyn StatementExecutor>) -> Self {
        Self::from_parts(UserService::new(executor))
    }
}
