use derive_more::Display;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Display)]
pub struct UnknownError(BoxedError);

impl std::error::Error for UnknownError {}

impl UnknownError {
    pub fn new(err: BoxedError) -> Self {
        Self(err)
    }
}

impl From<sqlx::error::Error> for UnknownError {
    fn from(err: sqlx::error::Error) -> Self {
        Self::new(err.into())
    }
}

pub mod app {
    use async_graphql::{ErrorExtensions, Value};
    use derive_more::Display;

    use super::{persistence::PersistenceError, resource::ValidationError};

    pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";

    #[derive(Debug, Display)]
    pub enum ApplicationError<R> {
        Validation(ValidationError<R>),
        Persistence(PersistenceError),
    }

    impl<R: std::fmt::Debug> std::error::Error for ApplicationError<R> {}

    impl<R> From<ValidationError<R>> for ApplicationError<R> {
        fn from(err: ValidationError<R>) -> Self {
            Self::Validation(err)
        }
    }

    impl<R> From<PersistenceError> for ApplicationError<R> {
        fn from(err: PersistenceError) -> Self {
            Self::Persistence(err)
        }
    }

    impl<R> ErrorExtensions for ApplicationError<R> {
        fn extend(&self) -> async_graphql::Error {
            match self {
                ApplicationError::Validation(err) => {
                    let fields: Vec<Value> = err
                        .fields
                        .iter()
                        .map(|field| Value::from(field.path.as_str()))
                        .collect();

                    async_graphql::Error::new(err.to_string()).extend_with(|_, ext| {
                        ext.set("code", BAD_USER_INPUT);
                        ext.set("fields", Value::List(fields));
                    })
                }
                ApplicationError::Persistence(err) => {
                    tracing::error!("persistence failure resolving query: {err}");
                    async_graphql::Error::new("Service Unavailable")
                        .extend_with(|_, ext| ext.set("code", SERVICE_UNAVAILABLE))
                }
            }
        }
    }
}

pub mod config {
    use derive_more::Display;

    #[derive(Debug, Display, Clone, PartialEq, Eq)]
    pub enum ConfigError {
        #[display(fmt = "Missing env var {_0}")]
        Missing(&'static str),
        #[display(fmt = "Invalid env var {name}: {value:?}")]
        Invalid { name: &'static str, value: String },
    }

    impl std::error::Error for ConfigError {}
}

pub mod service {
    use derive_more::Display;

    #[derive(Debug, Display)]
    pub enum DispatchError {
        #[display(fmt = "Dispatched operation timed out in {_0:?}")]
        Timeout(Option<std::time::Duration>),
        #[display(fmt = "IO error dispatching {_0}")]
        IO(std::io::Error),
    }

    impl std::error::Error for DispatchError {}
}

pub mod persistence {
    use std::io;

    use derive_more::Display;
    use salvo::{prelude::StatusError, writer::Json, Piece, Response};

    use super::{http::ErrorResponse, service::DispatchError, UnknownError};

    pub type SqlState = String;

    #[derive(Debug, Display)]
    pub enum PersistenceError {
        #[display(fmt = "database persistence error: SQLSTATE {_0:?}")]
        Database(Option<SqlState>),
        #[display(fmt = "persistence layer connection error: {_0}")]
        Connection(DispatchError),
        #[display(fmt = "PersistenceError data not found")]
        NotFound,
        #[display(fmt = "PersistenceError decoding data")]
        DecodeData,
        #[display(fmt = "PersistenceError data migration: {_0}")]
        DataMigration(String),
        #[display(fmt = "unknown persistence error: {_0}")]
        Unknown(UnknownError),
    }

    impl std::error::Error for PersistenceError {}

    type SqlxError = sqlx::error::Error;

    impl From<SqlxError> for PersistenceError {
        fn from(err: SqlxError) -> Self {
            match err {
                SqlxError::Configuration(_) => {
                    Self::Connection(DispatchError::IO(io::ErrorKind::InvalidInput.into()))
                }
                SqlxError::Database(db) => Self::Database(db.code().map(|code| code.into())),
                SqlxError::Io(io) => Self::Connection(DispatchError::IO(io)),
                SqlxError::Tls(_) => {
                    Self::Connection(DispatchError::IO(io::ErrorKind::ConnectionRefused.into()))
                }
                SqlxError::Protocol(msg) => Self::Connection(DispatchError::IO(io::Error::new(
                    io::ErrorKind::InvalidData,
                    msg,
                ))),
                SqlxError::RowNotFound => Self::NotFound,
                SqlxError::TypeNotFound { .. } => Self::DecodeData,
                SqlxError::ColumnIndexOutOfBounds { .. } => Self::DecodeData,
                SqlxError::ColumnNotFound(_) => Self::DecodeData,
                SqlxError::ColumnDecode { .. } => Self::DecodeData,
                SqlxError::Decode(_) => Self::DecodeData,
                SqlxError::PoolTimedOut => Self::Connection(DispatchError::Timeout(None)),
                SqlxError::PoolClosed => {
                    Self::Connection(DispatchError::IO(io::ErrorKind::NotConnected.into()))
                }
                SqlxError::Migrate(err) => Self::DataMigration(err.to_string()),
                _ => PersistenceError::Unknown(err.into()),
            }
        }
    }

    impl From<sqlx::migrate::MigrateError> for PersistenceError {
        fn from(err: sqlx::migrate::MigrateError) -> Self {
            match err {
                sqlx::migrate::MigrateError::Execute(err) => err.into(),
                err => Self::DataMigration(err.to_string()),
            }
        }
    }

    impl Piece for PersistenceError {
        fn render(self, res: &mut Response) {
            tracing::error!("{self}");
            let status = StatusError::service_unavailable();
            res.render(Json(ErrorResponse::from_status_error(&status, ())));
            res.set_status_error(status);
        }
    }

    #[cfg(test)]
    mod test {
        use super::*;

        #[test]
        fn map_sqlx_errors() {
            assert!(matches!(
                PersistenceError::from(SqlxError::RowNotFound),
                PersistenceError::NotFound
            ));
            assert!(matches!(
                PersistenceError::from(SqlxError::PoolTimedOut),
                PersistenceError::Connection(DispatchError::Timeout(None))
            ));
            assert!(matches!(
                PersistenceError::from(SqlxError::ColumnNotFound("title".into())),
                PersistenceError::DecodeData
            ));
        }
    }
}

pub mod resource {
    use derive_more::Display;
    use serde::Serialize;

    use crate::base::ResourceID;

    #[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize)]
    pub enum ValidationErrorKind {
        /// Inclusive lower bound exceeded.
        #[display(fmt = "minimum {_0}")]
        Minimum(i64),
        /// When some number is not positive.
        #[display(fmt = "positive")]
        Positive,
    }

    impl std::error::Error for ValidationErrorKind {}

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
    pub struct ValidationError<R> {
        /// Resource value
        pub resource: R,
        /// Name of the resource
        pub resource_type: &'static str,
        /// Invalid resource fields
        pub fields: Vec<ValidationFieldError>,
    }

    impl<R> ValidationError<R> {
        pub fn from_resource(resource: R, fields: Vec<ValidationFieldError>) -> Self
        where
            R: ResourceID,
        {
            Self {
                resource,
                resource_type: R::resource_id(),
                fields,
            }
        }
    }

    impl<R> std::fmt::Display for ValidationError<R> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("Invalid resource {}", self.resource_type))?;
            for field in self.fields.iter() {
                f.write_fmt(format_args!(", {field}"))?;
            }
            Ok(())
        }
    }

    impl<R: std::fmt::Debug> std::error::Error for ValidationError<R> {}

    #[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize)]
    #[display(fmt = "{path}: {value:?} {kinds:?}")]
    pub struct ValidationFieldError {
        /// Resource field path with invalid value
        pub path: String,
        /// Displayed invalid value
        pub value: String,
        /// Value type id
        pub type_id: &'static str,
        /// Kinds of validation errors
        pub kinds: Vec<ValidationErrorKind>,
    }

    impl ValidationFieldError {
        pub fn from_resource<T>(value: &T, path: String, kinds: Vec<ValidationErrorKind>) -> Self
        where
            T: ResourceID + ToString,
        {
            Self {
                path,
                type_id: T::resource_id(),
                value: value.to_string(),
                kinds,
            }
        }
    }
}

pub mod task {
    use std::process::ExitStatus;

    use derive_more::Display;

    use super::{config::ConfigError, persistence::PersistenceError};

    #[derive(Debug, Display)]
    pub enum TaskError {
        #[display(fmt = "configuration error: {_0}")]
        Config(ConfigError),
        #[display(fmt = "{_0}")]
        Persistence(PersistenceError),
        #[display(fmt = "invalid task argument {_0}")]
        InvalidArgument(String),
        #[display(fmt = "cannot listen on {address}: {reason}")]
        Bind { address: String, reason: String },
        #[display(fmt = "IO error running task: {_0}")]
        Io(std::io::Error),
        #[display(fmt = "command `{command}` failed with {status}")]
        Command { command: String, status: ExitStatus },
    }

    impl std::error::Error for TaskError {}

    impl From<ConfigError> for TaskError {
        fn from(err: ConfigError) -> Self {
            Self::Config(err)
        }
    }

    impl From<PersistenceError> for TaskError {
        fn from(err: PersistenceError) -> Self {
            Self::Persistence(err)
        }
    }

    impl From<sqlx::error::Error> for TaskError {
        fn from(err: sqlx::error::Error) -> Self {
            Self::Persistence(err.into())
        }
    }

    impl From<sqlx::migrate::MigrateError> for TaskError {
        fn from(err: sqlx::migrate::MigrateError) -> Self {
            Self::Persistence(err.into())
        }
    }

    impl From<std::io::Error> for TaskError {
        fn from(err: std::io::Error) -> Self {
            Self::Io(err)
        }
    }
}

pub mod http {
    use derive_more::Display;
    use salvo::{http::ParseError, prelude::StatusError, writer::Json, Piece, Response};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Display, Clone, Serialize, Deserialize)]
    pub enum BadRequest {
        InvalidContent,
    }

    impl std::error::Error for BadRequest {}

    #[derive(Debug, Display, Clone, Serialize, Deserialize)]
    #[display(fmt = "Response error: {title}, {message}")]
    pub struct ErrorResponse<T> {
        pub title: String,
        pub message: String,
        pub error: T,
    }

    impl<T> ErrorResponse<T> {
        pub fn from_status_error(status: &StatusError, err: T) -> Self {
            Self {
                title: status.name.clone(),
                message: status
                    .summary
                    .clone()
                    .unwrap_or_else(|| status.name.clone()),
                error: err,
            }
        }
    }

    impl From<ParseError> for BadRequest {
        fn from(err: ParseError) -> Self {
            tracing::debug!("rejecting request body: {err}");
            BadRequest::InvalidContent
        }
    }

    impl Piece for BadRequest {
        fn render(self, res: &mut Response) {
            let status = StatusError::bad_request();
            res.render(Json(ErrorResponse::from_status_error(&status, self)));
            res.set_status_error(status);
        }
    }
}
