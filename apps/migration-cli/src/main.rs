use clap::{Parser, ValueEnum};
use migration::MigrationCommand;
use sea_orm::{ConnectOptions, Database};

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Silhouette directory schema migrations")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,

    /// Connection url; postgres:// or sqlite://
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    if args.database_url.contains(":memory:") || args.database_url.contains("mode=memory") {
        eprintln!("❌ In-memory SQLite is gone when the command exits; use a file or postgres url.");
        std::process::exit(2);
    }

    let mut options = ConnectOptions::new(args.database_url);
    options.max_connections(1).sqlx_logging(false);

    let conn = match Database::connect(options).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("❌ Could not connect: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migration::migrate(&conn, args.command.into()).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
