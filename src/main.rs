//! Operator command-line tool for the blogd backend.
//!
//! Applies embedded migrations and provisions accounts directly against
//! the store. The web API is hosted elsewhere; this binary exists so an
//! operator can bootstrap a deployment before that application starts.

use anyhow::Context;
use blogd::{
    config::AppConfig,
    credentials,
    db::{apply_migrations, create_user, establish_pool},
    models::NewUser,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Database connection string or SQLite path; overrides the
    /// configured value.
    #[arg(long)]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply embedded migrations and exit.
    Migrate,
    /// Create a new user account.
    CreateUser {
        /// Externally assigned account id.
        id: String,
        /// Unique account name.
        name: String,
        /// Plaintext password; hashed with the configured salt.
        password: String,
        /// Initial permission mask.
        #[arg(long, default_value_t = 0)]
        permission: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("loading configuration")?;
    let database = cli
        .database
        .unwrap_or_else(|| config.database.clone());

    let pool = establish_pool(&database)
        .await
        .context("building connection pool")?;
    let mut conn = pool.get().await.context("getting database connection")?;
    #[cfg(feature = "sqlite")]
    blogd::db::enable_foreign_keys(&mut conn)
        .await
        .context("enabling foreign keys")?;
    apply_migrations(&mut conn, &database)
        .await
        .context("applying migrations")?;

    match cli.command {
        Commands::Migrate => {
            println!("migrations applied to {database}");
        }
        Commands::CreateUser {
            id,
            name,
            password,
            permission,
        } => {
            let hash = credentials::hash_password(&password, &config.password_salt);
            create_user(
                &mut conn,
                &NewUser {
                    id: &id,
                    name: &name,
                    password: &hash,
                    permission,
                },
            )
            .await
            .context("creating user")?;
            println!("user {name} created");
        }
    }
    Ok(())
}
