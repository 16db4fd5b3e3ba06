//! oxide-dialect CLI
//!
//! Prints the SQL a dialect generates for a model, and optionally runs an
//! insert against a live database.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use oxide_dialect_core::{BaseDialect, Dialect, DialectRegistry, ForeignKey};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use commands::ActionArg;

/// SQL dialect inspector.
#[derive(Parser)]
#[command(name = "oxide-dialect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL, needed only to execute inserts.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Dialect to generate SQL for.
    #[arg(short, long, env = "OXIDE_DIALECT", default_value = "cockroachdb")]
    dialect: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered dialects.
    Dialects,

    /// Show the column type for a field kind.
    SqlType {
        /// Field kind, e.g. `id`, `string`, `nullable_int64`, `created_utc`.
        kind: String,

        /// Size hint for bounded types.
        #[arg(short, long, default_value_t = 0)]
        size: usize,
    },

    /// Show CREATE TABLE and index statements for a JSON model.
    CreateTable {
        /// Path to the model JSON file.
        model: PathBuf,

        /// Add IF NOT EXISTS.
        #[arg(long)]
        if_not_exists: bool,
    },

    /// Show an index or unique-constraint statement.
    CreateIndex {
        /// Index or constraint name.
        #[arg(short, long)]
        name: String,

        /// Table name.
        #[arg(short, long)]
        table: String,

        /// Create a unique constraint.
        #[arg(short, long)]
        unique: bool,

        /// Indexed columns.
        #[arg(required = true, value_delimiter = ',')]
        columns: Vec<String>,
    },

    /// Show a foreign-key constraint clause.
    ForeignKey {
        /// Constraint name.
        #[arg(short, long)]
        name: String,

        /// Owning column.
        #[arg(short, long)]
        column: String,

        /// Referenced table.
        #[arg(long)]
        reference_table: String,

        /// Referenced column.
        #[arg(long, default_value = "id")]
        reference_column: String,

        /// Action on update.
        #[arg(long, value_enum)]
        on_update: Option<ActionArg>,

        /// Action on delete.
        #[arg(long, value_enum)]
        on_delete: Option<ActionArg>,
    },

    /// Insert a JSON model and print the generated key.
    Insert {
        /// Path to the model JSON file.
        model: PathBuf,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut registry = DialectRegistry::new();
    registry.register(BaseDialect::NAME, BaseDialect::new());
    oxide_dialect_cockroach::register(&mut registry);
    let registry = registry.install()?;

    match cli.command {
        Commands::Dialects => {
            println!("{}", commands::render_dialects(registry, &cli.dialect));
        }

        Commands::SqlType { kind, size } => {
            let dialect = select(registry, &cli.dialect)?;
            println!("{}", commands::render_sql_type(dialect.as_ref(), &kind, size)?);
        }

        Commands::CreateTable {
            model,
            if_not_exists,
        } => {
            let dialect = select(registry, &cli.dialect)?;
            let model = commands::load_model(&model)?;
            println!(
                "{}",
                commands::render_create_table(dialect.as_ref(), &model, if_not_exists)?
            );
        }

        Commands::CreateIndex {
            name,
            table,
            unique,
            columns,
        } => {
            let dialect = select(registry, &cli.dialect)?;
            println!(
                "{}",
                commands::render_create_index(dialect.as_ref(), &name, &table, unique, &columns)
            );
        }

        Commands::ForeignKey {
            name,
            column,
            reference_table,
            reference_column,
            on_update,
            on_delete,
        } => {
            let dialect = select(registry, &cli.dialect)?;
            let fk = ForeignKey::new(name, column, reference_table, reference_column);
            println!(
                "{}",
                commands::render_foreign_key(dialect.as_ref(), fk, on_update, on_delete)
            );
        }

        Commands::Insert { model, dry_run } => {
            let dialect = select(registry, &cli.dialect)?;
            let model = commands::load_model(&model)?;

            if dry_run {
                info!("Dry run mode - SQL will be printed but not executed.");
                println!("{}", commands::render_insert(dialect.as_ref(), &model));
                return Ok(());
            }

            let url = cli
                .database_url
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required to execute an insert"))?;

            let id = if url.starts_with("sqlite:") {
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect(&url)
                    .await?;
                dialect.insert(&pool, &model).await?
            } else {
                let pool = PgPoolOptions::new()
                    .max_connections(1)
                    .connect(&url)
                    .await?;
                dialect.insert(&pool, &model).await?
            };

            info!(table = %model.table, id, "row inserted");
            println!("{id}");
        }
    }

    Ok(())
}

/// Looks the selected dialect up in the installed registry.
fn select(registry: &DialectRegistry, name: &str) -> anyhow::Result<Arc<dyn Dialect>> {
    let dialect = registry.require(name)?;
    debug!(dialect = dialect.name(), "selected dialect");
    Ok(dialect)
}
