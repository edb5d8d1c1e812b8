use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    config::env_var,
    error::task::TaskError,
    infra::{
        compose::{ComposeServices, Lifecycle, DEFAULT_COMPOSE_FILE},
        database::{admin, connection},
        server,
    },
};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "GraphQL catalog of books and authors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the GraphQL API (default)
    Serve {
        /// Apply pending migrations before accepting requests
        #[arg(long)]
        migrate: bool,
        #[arg(long, default_value = admin::MIGRATIONS_DIR)]
        source: PathBuf,
    },
    /// Apply pending database migrations
    Migrate {
        #[arg(long, default_value = admin::MIGRATIONS_DIR)]
        source: PathBuf,
    },
    /// Create the application database
    CreateDb,
    /// Drop the application database
    DropDb {
        #[arg(long)]
        if_exists: bool,
    },
    /// Start or stop the dependent services
    Services {
        #[command(subcommand)]
        action: ServicesAction,
        #[arg(long, short = 'f', global = true, default_value = DEFAULT_COMPOSE_FILE)]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ServicesAction {
    Up,
    Down,
}

impl From<ServicesAction> for Lifecycle {
    fn from(action: ServicesAction) -> Self {
        match action {
            ServicesAction::Up => Lifecycle::Up,
            ServicesAction::Down => Lifecycle::Down,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<(), TaskError> {
        let command = self.command.unwrap_or(Command::Serve {
            migrate: false,
            source: admin::MIGRATIONS_DIR.into(),
        });

        match command {
            Command::Serve { migrate, source } => {
                let env = env_var::load()?;
                server::serve(&env, migrate.then_some(source.as_path())).await
            }
            Command::Migrate { source } => {
                let database = env_var::load_database()?;
                let pool = connection::create_sqlx_pool(&database).await?;
                let result = admin::migrate(&pool, &source).await;
                pool.close().await;
                result
            }
            Command::CreateDb => admin::create_database(&env_var::load_database()?).await,
            Command::DropDb { if_exists } => {
                admin::drop_database(&env_var::load_database()?, if_exists).await
            }
            Command::Services { action, file } => {
                ComposeServices::new(file).run(action.into()).await
            }
        }
    }
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_command_is_none() {
        let cli = Cli::try_parse_from(["bookshelf"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_services_up_with_file() {
        let cli = Cli::try_parse_from(["bookshelf", "services", "up", "-f", "dev.yml"]).unwrap();
        match cli.command {
            Some(Command::Services { action, file }) => {
                assert!(matches!(action, ServicesAction::Up));
                assert_eq!(file, PathBuf::from("dev.yml"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parse_drop_db() {
        let cli = Cli::try_parse_from(["bookshelf", "drop-db", "--if-exists"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::DropDb { if_exists: true })
        ));
    }
}
