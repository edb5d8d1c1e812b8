pub mod compose;
pub mod controller;
pub mod database;
pub mod graphql;

pub mod router {
    use salvo::{logging::Logger, Router};
    use sqlx::PgPool;

    use super::{
        controller::*,
        graphql::{build_schema, CatalogSchema},
    };

    pub const GRAPHQL_PATH: &str = "graphql";

    pub fn app(pool: &PgPool) -> Router {
        app_with_schema(pool, build_schema(pool.clone()))
    }

    pub fn app_with_schema(pool: &PgPool, schema: CatalogSchema) -> Router {
        Router::new()
            .push(
                Router::with_path(GRAPHQL_PATH)
                    .get(GraphiQLController::new(&format!("/{GRAPHQL_PATH}")))
                    .post(GraphQLController::new(schema)),
            )
            .push(Router::with_path("health").get(HealthController::new(pool.clone())))
            .hoop(Logger)
    }
}

pub mod server {
    use std::path::Path;

    use salvo::{listener::TcpListener, Server};
    use tokio::net::lookup_host;

    use super::{
        database::{admin, connection},
        router,
    };
    use crate::{config::env_var::EnvVar, error::task::TaskError};

    pub async fn serve(env: &EnvVar, migrations: Option<&Path>) -> Result<(), TaskError> {
        let pool = connection::create_sqlx_pool(&env.database).await?;
        if let Some(source) = migrations {
            admin::migrate(&pool, source).await?;
        }

        let listener = bind_listener(&env.host, env.port).await?;

        Server::new(listener)
            .serve_with_graceful_shutdown(router::app(&pool), shutdown_signal())
            .await;

        pool.close().await;
        tracing::info!("server stopped");
        Ok(())
    }

    /// Resolve `host:port` and bind the first address that accepts a listener.
    pub async fn bind_listener(host: &str, port: u16) -> Result<TcpListener, TaskError> {
        let address = format!("{host}:{port}");
        let bind_error = |reason: String| TaskError::Bind {
            address: address.clone(),
            reason,
        };

        let mut last_error = None;
        let candidates = lookup_host(&address)
            .await
            .map_err(|err| bind_error(err.to_string()))?;
        for addr in candidates {
            match TcpListener::try_bind(addr) {
                Ok(listener) => {
                    tracing::info!("listening on http://{addr}");
                    return Ok(listener);
                }
                Err(err) => last_error = Some(err.to_string()),
            }
        }

        Err(bind_error(
            last_error.unwrap_or_else(|| "no address resolved".into()),
        ))
    }

    async fn shutdown_signal() {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown signal received");
    }

    #[cfg(test)]
    mod test {
        use super::*;

        #[tokio::test]
        async fn bind_ephemeral_port() {
            assert!(bind_listener("127.0.0.1", 0).await.is_ok());
        }

        #[tokio::test]
        async fn occupied_port_is_bind_error() {
            let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let port = taken.local_addr().unwrap().port();

            let err = bind_listener("127.0.0.1", port).await.err().unwrap();
            match err {
                TaskError::Bind { address, .. } => assert_eq!(address, format!("127.0.0.1:{port}")),
                other => panic!("unexpected error {other}"),
            }
        }

        #[tokio::test]
        async fn unresolvable_host_is_bind_error() {
            let err = bind_listener("not a host", 8000).await.err().unwrap();
            assert!(matches!(err, TaskError::Bind { .. }));
        }
    }
}
