use std::{future::Future, sync::Arc, time::Duration};

use tracing::{debug, error, info, instrument, warn};

use crate::users::{
    error::UserError,
    query::{InsertUser, UpdateUser, UserQueries},
    repo::StatementExecutor,
    repo_types::{User, UserRole, UserRow},
};

/// Create, read, update and delete users, one round trip per call.
///
/// Update and delete do not check that the user exists first: on an unknown
/// id they succeed without touching anything.
#[derive(Clone)]
pub struct UserService {
    executor: Arc<dyn StatementExecutor>,
    queries: UserQueries,
    deadline: Option<Duration>,
}

impl UserService {
    pub fn new(executor: Arc<dyn StatementExecutor>) -> Self {
        let queries = UserQueries::new(executor.dialect());
        Self {
            executor,
            queries,
            deadline: None,
        }
    }

    /// Bounds every round trip. `None` waits for as long as the store takes.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    #[instrument(skip_all, name = "users.create", fields(role = ?user.role))]
    pub async fn create(&self, user: InsertUser<'_>) -> Result<i64, UserError> {
        let stmt = self.queries.insert(&user).map_err(|e| {
            error!(error = %e, "failed to build insert");
            UserError::from(e)
        })?;

        match self.round_trip(self.executor.fetch_id(stmt)).await {
            Ok(id) => {
                info!(user_id = id, "user created");
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "failed to create user");
                Err(e)
            }
        }
    }

    #[instrument(skip(self), name = "users.get")]
    pub async fn get(&self, id: i64) -> Result<User, UserError> {
        let stmt = self.queries.get(id);

        match self.round_trip(self.executor.fetch_user(stmt)).await {
            Ok(Some(row)) => Ok(into_user(row)),
            Ok(None) => {
                info!("user not found");
                Err(UserError::NotFound(id))
            }
            Err(e) => {
                error!(error = %e, "failed to select user");
                Err(e)
            }
        }
    }

    /// `role` is accepted by callers but never written; changing it is not
    /// part of this path.
    #[instrument(
        skip(self, changes),
        name = "users.update",
        fields(name = changes.name.is_some(), email = changes.email.is_some())
    )]
    pub async fn update(&self, id: i64, changes: UpdateUser<'_>) -> Result<(), UserError> {
        let stmt = self.queries.update(id, &changes);

        match self.round_trip(self.executor.execute(stmt)).await {
            Ok(0) => {
                debug!("update matched no user");
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => {
                error!(error = %e, "failed to update user");
                Err(e)
            }
        }
    }

    #[instrument(skip(self), name = "users.delete")]
    pub async fn delete(&self, id: i64) -> Result<(), UserError> {
        let stmt = self.queries.delete(id);

        match self.round_trip(self.executor.execute(stmt)).await {
            Ok(0) => {
                debug!("delete matched no user");
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => {
                error!(error = %e, "failed to delete user");
                Err(e)
            }
        }
    }

    async fn round_trip<T, F>(&self, call: F) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match self.deadline {
            // on expiry the call future is dropped, which aborts the query
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| UserError::Timeout(limit))?
                .map_err(UserError::from),
            None => call.await.map_err(UserError::from),
        }
    }
}

fn into_user(row: UserRow) -> User {
    let role = UserRole::try_from(row.role).unwrap_or_else(|raw| {
        warn!(user_id = row.id, role = raw, "unknown role in store");
        UserRole::Unspecified
    });

    User {
        id: row.id,
        name: row.name,
        email: row.email,
        role,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
