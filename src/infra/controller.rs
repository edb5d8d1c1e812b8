use async_graphql::http::GraphiQLSource;
use async_trait::async_trait;
use salvo::{
    http::StatusCode,
    writer::{Json, Text},
    Depot, FlowCtrl, Handler, Request, Response,
};
use sqlx::PgPool;

use crate::{
    app::resource::health::HealthResponse, error::http::BadRequest,
    infra::database::repository, infra::graphql::CatalogSchema,
};

macro_rules! map_res_err {
    ($result:ident, $response:ident) => {
        match $result {
            Err(err) => {
                $response.render(err);
                return;
            }
            Ok(ok) => ok,
        }
    };
}

pub struct GraphQLController {
    schema: CatalogSchema,
}

impl GraphQLController {
    pub fn new(schema: CatalogSchema) -> Self {
        Self { schema }
    }
}

#[async_trait]
impl Handler for GraphQLController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result: Result<async_graphql::Request, _> =
            req.parse_json().await.map_err(BadRequest::from);
        let gql_request = map_res_err!(result, res);

        let gql_response = self.schema.execute(gql_request).await;
        if gql_response.is_err() {
            tracing::debug!(errors = ?gql_response.errors, "graphql request resolved with errors");
        }

        res.render(Json(gql_response));
        res.set_status_code(StatusCode::OK);
    }
}

pub struct GraphiQLController {
    page: String,
}

impl GraphiQLController {
    pub fn new(endpoint: &str) -> Self {
        Self {
            page: GraphiQLSource::build().endpoint(endpoint).finish(),
        }
    }
}

#[async_trait]
impl Handler for GraphiQLController {
    async fn handle(&self, _: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        res.render(Text::Html(self.page.clone()));
        res.set_status_code(StatusCode::OK);
    }
}

pub struct HealthController {
    pool: PgPool,
}

impl HealthController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Handler for HealthController {
    async fn handle(&self, _: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = repository::ping(&self.pool).await;
        map_res_err!(result, res);

        res.render(Json(HealthResponse::ok()));
        res.set_status_code(StatusCode::OK);
    }
}
