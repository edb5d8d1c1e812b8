pub mod connection {
    use std::time::Duration;

    use sqlx::postgres::{PgPool, PgPoolOptions};

    use crate::{config::env_var::DatabaseConfig, error::task::TaskError};

    fn pool_options() -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .acquire_timeout(Duration::from_millis(1000))
            .idle_timeout(Duration::from_millis(1000 * 30))
            .max_lifetime(Duration::from_millis(1000 * 10))
    }

    pub async fn create_sqlx_pool(config: &DatabaseConfig) -> Result<PgPool, TaskError> {
        let pool = pool_options()
            .connect_with(config.connect_options())
            .await?;
        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "database pool connected"
        );
        Ok(pool)
    }

    /// Pool that opens its first connection on demand.
    pub fn create_lazy_sqlx_pool(url: &str) -> Result<PgPool, TaskError> {
        Ok(pool_options().min_connections(0).connect_lazy(url)?)
    }
}

pub mod sql {
    use sqlx::{Database, Encode, QueryBuilder, Type};

    /// Appends `AND`-joined predicates, preceded by `WHERE` on the first one.
    pub struct Conditions {
        empty: bool,
    }

    impl Conditions {
        pub fn new() -> Self {
            Self { empty: true }
        }

        pub fn next<'args, DB: Database>(&mut self, qb: &mut QueryBuilder<'args, DB>) {
            if self.empty {
                qb.push(" WHERE ");
                self.empty = false;
            } else {
                qb.push(" AND ");
            }
        }
    }

    impl Default for Conditions {
        fn default() -> Self {
            Self::new()
        }
    }

    pub fn push_limit<'args, T, DB>(qb: &mut QueryBuilder<'args, DB>, limit: Option<T>)
    where
        T: 'args + Encode<'args, DB> + Send + Type<DB>,
        DB: Database,
    {
        if let Some(limit) = limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit);
        }
    }

    /// Quote a SQL identifier, doubling any embedded double quote.
    pub fn quote_ident(ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    #[cfg(test)]
    mod test {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn quote_identifiers() {
            assert_eq!(quote_ident("bookshelf"), "\"bookshelf\"");
            assert_eq!(quote_ident("my \"db\""), "\"my \"\"db\"\"\"");
        }
    }
}

pub mod repository {
    use futures::TryStreamExt;
    use sqlx::{PgPool, Postgres, QueryBuilder};

    use super::sql::{self, Conditions};
    use crate::{
        domain::{
            datatype::BookFilter,
            entity::catalog::{Author, Book},
        },
        error::persistence::PersistenceError,
    };

    const SELECT_BOOKS: &str = concat!(
        "SELECT b.id AS book_id, b.title AS book_title, ",
        "a.id AS author_id, a.name AS author_name ",
        "FROM books b INNER JOIN authors a ON a.id = b.author_id",
    );

    pub(crate) fn books_query(filter: &BookFilter) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(SELECT_BOOKS);
        let mut conditions = Conditions::new();

        if !filter.author_ids.is_empty() {
            conditions.next(&mut qb);
            qb.push("a.id = ANY(");
            qb.push_bind(filter.author_ids.clone());
            qb.push(")");
        }

        if let Some(search) = filter.search_text() {
            conditions.next(&mut qb);
            qb.push("b.title ILIKE '%' || ");
            qb.push_bind(search.to_owned());
            qb.push(" || '%'");
        }

        qb.push(" ORDER BY b.id");
        sql::push_limit(&mut qb, filter.limit);

        qb
    }

    pub async fn find_books(
        pool: &PgPool,
        filter: &BookFilter,
    ) -> Result<Vec<Book>, PersistenceError> {
        let mut qb = books_query(filter);
        let mut rows = qb.build().fetch(pool);

        let mut books = Vec::new();
        while let Some(row) = rows.try_next().await? {
            books.push(Book::try_from(&row)?);
        }

        Ok(books)
    }

    pub async fn find_authors(pool: &PgPool) -> Result<Vec<Author>, PersistenceError> {
        let mut rows = sqlx::query(
            "SELECT a.id AS author_id, a.name AS author_name FROM authors a ORDER BY a.id",
        )
        .fetch(pool);

        let mut authors = Vec::new();
        while let Some(row) = rows.try_next().await? {
            authors.push(Author::try_from(&row)?);
        }

        Ok(authors)
    }

    pub async fn ping(pool: &PgPool) -> Result<(), PersistenceError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

}

pub mod admin {
    use std::path::Path;

    use sqlx::{migrate::Migrator, Connection, Executor, PgConnection, PgPool};

    use super::sql::quote_ident;
    use crate::{config::env_var::DatabaseConfig, error::task::TaskError};

    pub const MIGRATIONS_DIR: &str = "migrations";

    pub(crate) fn create_database_statement(name: &str) -> Result<String, TaskError> {
        validate_name(name)?;
        Ok(format!("CREATE DATABASE {}", quote_ident(name)))
    }

    pub(crate) fn drop_database_statement(name: &str, if_exists: bool) -> Result<String, TaskError> {
        validate_name(name)?;
        let guard = if if_exists { "IF EXISTS " } else { "" };
        Ok(format!("DROP DATABASE {guard}{}", quote_ident(name)))
    }

    fn validate_name(name: &str) -> Result<(), TaskError> {
        if name.trim().is_empty() {
            return Err(TaskError::InvalidArgument(
                "POSTGRES_DB_NAME must not be empty".into(),
            ));
        }
        Ok(())
    }

    async fn execute_maintenance(config: &DatabaseConfig, statement: &str) -> Result<(), TaskError> {
        let mut conn = PgConnection::connect_with(&config.maintenance_connect_options()).await?;
        tracing::info!("{statement}");
        conn.execute(statement).await?;
        conn.close().await?;
        Ok(())
    }

    pub async fn create_database(config: &DatabaseConfig) -> Result<(), TaskError> {
        let statement = create_database_statement(&config.name)?;
        execute_maintenance(config, &statement).await
    }

    pub async fn drop_database(config: &DatabaseConfig, if_exists: bool) -> Result<(), TaskError> {
        let statement = drop_database_statement(&config.name, if_exists)?;
        execute_maintenance(config, &statement).await
    }

    /// Apply every pending migration found in `source`.
    pub async fn migrate(pool: &PgPool, source: &Path) -> Result<(), TaskError> {
        let migrator = Migrator::new(source).await?;
        for migration in migrator.iter() {
            tracing::debug!(
                version = migration.version,
                "known migration {}",
                migration.description
            );
        }
        migrator.run(pool).await?;
        tracing::info!(source = %source.display(), "migrations applied");
        Ok(())
    }

    #[cfg(test)]
    mod test {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn database_statements() {
            assert_eq!(
                create_database_statement("bookshelf").unwrap(),
                "CREATE DATABASE \"bookshelf\""
            );
            assert_eq!(
                drop_database_statement("bookshelf", false).unwrap(),
                "DROP DATABASE \"bookshelf\""
            );
            assert_eq!(
                drop_database_statement("bookshelf", true).unwrap(),
                "DROP DATABASE IF EXISTS \"bookshelf\""
            );
        }

        #[test]
        fn reject_empty_database_name() {
            assert!(matches!(
                create_database_statement("  "),
                Err(TaskError::InvalidArgument(_))
            ));
        }
    }
}
