//! Parameterized statements for the `users` table.
//!
//! Nothing here touches the database. Every caller-supplied value ends up in
//! [`Statement::values`] and is bound to a placeholder at execution time; the
//! SQL text only ever contains identifiers and placeholders.

use sea_query::{
    Expr, Iden, PostgresQueryBuilder, Query, QueryStatementWriter, SqliteQueryBuilder, Values,
};
use thiserror::Error;

use crate::users::repo_types::UserRole;

/// Placeholder convention of the backend a statement is rendered for.
///
/// The pool executor always reports `Postgres`; `Sqlite` is a rendering
/// target only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `$1, $2, ...`
    Postgres,
    /// `?`
    Sqlite,
}

/// SQL text plus the positional arguments bound to its placeholders.
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub values: Values,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("could not build statement: {0:?}")]
    Build(sea_query::error::Error),
}

#[derive(Iden)]
pub enum Users {
    #[iden = "users"]
    Table,
    #[iden = "user_id"]
    Id,
    #[iden = "user_name"]
    Name,
    #[iden = "user_email"]
    Email,
    #[iden = "user_password"]
    Password,
    #[iden = "user_role"]
    Role,
    #[iden = "user_created_at"]
    CreatedAt,
    #[iden = "user_updated_at"]
    UpdatedAt,
}

/// Input of [`UserQueries::insert`].
#[derive(Debug, Clone, Copy)]
pub struct InsertUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: UserRole,
}

/// Input of [`UserQueries::update`]. `None` leaves the column untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateUser<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
}

/// Builds the four user statements for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct UserQueries {
    dialect: Dialect,
}

impl UserQueries {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// `INSERT ... RETURNING user_id`
    pub fn insert(&self, user: &InsertUser<'_>) -> Result<Statement, QueryError> {
        let mut query = Query::insert();
        query
            .into_table(Users::Table)
            .columns([Users::Name, Users::Email, Users::Password, Users::Role])
            .values([
                user.name.into(),
                user.email.into(),
                user.password.into(),
                i32::from(user.role).into(),
            ])
            .map_err(QueryError::Build)?
            .returning_col(Users::Id);

        Ok(self.render(&query))
    }

    /// Selects every readable column of one user. The password is never selected.
    pub fn get(&self, id: i64) -> Statement {
        let query = Query::select()
            .columns([
                Users::Id,
                Users::Name,
                Users::Email,
                Users::Role,
                Users::CreatedAt,
                Users::UpdatedAt,
            ])
            .from(Users::Table)
            .and_where(Expr::col(Users::Id).eq(id))
            .limit(1)
            .to_owned();

        self.render(&query)
    }

    /// Sets only the supplied columns, and always bumps `user_updated_at`.
    pub fn update(&self, id: i64, changes: &UpdateUser<'_>) -> Statement {
        let mut query = Query::update();
        query.table(Users::Table);

        if let Some(name) = changes.name {
            query.value(Users::Name, name);
        }
        if let Some(email) = changes.email {
            query.value(Users::Email, email);
        }

        query
            .value(Users::UpdatedAt, Expr::cust("CURRENT_TIMESTAMP"))
            .and_where(Expr::col(Users::Id).eq(id));

        self.render(&query)
    }

    pub fn delete(&self, id: i64) -> Statement {
        let query = Query::delete()
            .from_table(Users::Table)
            .and_where(Expr::col(Users::Id).eq(id))
            .to_owned();

        self.render(&query)
    }

    fn render<S: QueryStatementWriter>(&self, query: &S) -> Statement {
        let (sql, values) = match self.dialect {
            Dialect::Postgres => query.build(PostgresQueryBuilder),
            Dialect::Sqlite => query.build(SqliteQueryBuilder),
        };
        Statement { sql, values }
    }
}
