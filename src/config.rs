pub mod env_var {
    use sqlx::postgres::PgConnectOptions;

    use crate::error::config::ConfigError;

    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8000;
    pub const MAINTENANCE_DATABASE: &str = "postgres";

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EnvVar {
        pub host: String,
        pub port: u16,
        pub database: DatabaseConfig,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DatabaseConfig {
        pub user: String,
        pub password: String,
        pub host: String,
        pub port: u16,
        pub name: String,
    }

    impl DatabaseConfig {
        /// Connect options of the application database.
        pub fn connect_options(&self) -> PgConnectOptions {
            self.connect_options_for(&self.name)
        }

        /// Connect options of the server maintenance database, used to create
        /// and drop the application database.
        pub fn maintenance_connect_options(&self) -> PgConnectOptions {
            self.connect_options_for(MAINTENANCE_DATABASE)
        }

        fn connect_options_for(&self, dbname: &str) -> PgConnectOptions {
            PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(dbname)
                .application_name("bookshelf")
        }
    }

    /// Load the `.env` file when present, then read the process environment.
    pub fn load() -> Result<EnvVar, ConfigError> {
        if let Err(err) = dotenv::dotenv() {
            tracing::debug!("no .env file loaded: {err}");
        }
        from_lookup(|name| std::env::var(name).ok())
    }

    pub fn load_database() -> Result<DatabaseConfig, ConfigError> {
        load().map(|env| env.database)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<EnvVar, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));
        let port = |name: &'static str, value: String| {
            value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name, value })
        };

        let database = DatabaseConfig {
            user: required("POSTGRES_USER")?,
            password: required("POSTGRES_PASSWORD")?,
            host: required("POSTGRES_HOST")?,
            port: port("POSTGRES_PORT", required("POSTGRES_PORT")?)?,
            name: required("POSTGRES_DB_NAME")?,
        };

        Ok(EnvVar {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port: match lookup("PORT") {
                Some(value) => port("PORT", value)?,
                None => DEFAULT_PORT,
            },
            database,
        })
    }

    #[cfg(test)]
    mod test {
        use std::collections::HashMap;

        use pretty_assertions::assert_eq;

        use super::*;

        fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        }

        fn complete() -> HashMap<String, String> {
            vars(&[
                ("POSTGRES_USER", "books"),
                ("POSTGRES_PASSWORD", "secret"),
                ("POSTGRES_HOST", "localhost"),
                ("POSTGRES_PORT", "5432"),
                ("POSTGRES_DB_NAME", "bookshelf"),
            ])
        }

        #[test]
        fn load_with_defaults() {
            let env = complete();
            let cfg = from_lookup(|k| env.get(k).cloned()).unwrap();

            assert_eq!(cfg.host, "0.0.0.0");
            assert_eq!(cfg.port, 8000);
            assert_eq!(cfg.database.name, "bookshelf");
            assert_eq!(cfg.database.port, 5432);
        }

        #[test]
        fn missing_variable() {
            let mut env = complete();
            env.remove("POSTGRES_HOST");
            let err = from_lookup(|k| env.get(k).cloned()).unwrap_err();

            assert_eq!(err, ConfigError::Missing("POSTGRES_HOST"));
        }

        #[test]
        fn invalid_port() {
            let mut env = complete();
            env.insert("PORT".into(), "http".into());
            let err = from_lookup(|k| env.get(k).cloned()).unwrap_err();

            assert_eq!(
                err,
                ConfigError::Invalid {
                    name: "PORT",
                    value: "http".into()
                }
            );
        }

        #[test]
        fn connect_options() {
            let env = complete();
            let db = from_lookup(|k| env.get(k).cloned()).unwrap().database;

            let opts = db.connect_options();
            assert_eq!(opts.get_host(), "localhost");
            assert_eq!(opts.get_port(), 5432);
            assert_eq!(opts.get_username(), "books");
            assert_eq!(opts.get_database(), Some("bookshelf"));

            let opts = db.maintenance_connect_options();
            assert_eq!(opts.get_database(), Some("postgres"));
        }

        #[test]
        fn connect_options_keep_database_name_verbatim() {
            let mut env = complete();
            env.insert("POSTGRES_DB_NAME".into(), "my \"db\" 100%".into());
            env.insert("POSTGRES_PASSWORD".into(), "p@ss:w/rd".into());
            let db = from_lookup(|k| env.get(k).cloned()).unwrap().database;

            let opts = db.connect_options();
            assert_eq!(opts.get_database(), Some("my \"db\" 100%"));
        }
    }
}
