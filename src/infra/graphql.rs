use async_graphql::{Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Schema};
use sqlx::PgPool;

use crate::{
    app::{
        resource::catalog::{AuthorResponse, BookResponse},
        use_case,
    },
    domain::datatype::BookFilter,
    error::app::ApplicationError,
};

pub type CatalogSchema = Schema<Query, EmptyMutation, EmptySubscription>;

pub fn build_schema(pool: PgPool) -> CatalogSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(pool)
        .finish()
}

pub struct Query;

#[Object]
impl Query {
    /// Books of the catalog, optionally filtered by author and title.
    async fn books(
        &self,
        ctx: &Context<'_>,
        author_ids: Option<Vec<i32>>,
        search: Option<String>,
        limit: Option<i32>,
    ) -> async_graphql::Result<Vec<BookResponse>> {
        let pool = ctx.data::<PgPool>()?;
        let filter = BookFilter {
            author_ids: author_ids.unwrap_or_default(),
            search,
            limit: limit.map(i64::from),
        };

        use_case::catalog::list_books(pool, filter)
            .await
            .map_err(|err| err.extend())
    }

    async fn authors(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<AuthorResponse>> {
        let pool = ctx.data::<PgPool>()?;

        use_case::catalog::list_authors(pool)
            .await
            .map_err(|err| ApplicationError::<()>::from(err).extend())
    }
}
