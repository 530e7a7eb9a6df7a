//! CLI entry point for postview

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postview::PostView;

#[derive(Parser)]
#[command(name = "postview")]
#[command(version)]
#[command(about = "Server-rendered blog post pages backed by a headless content store", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Read posts from a JSON fixture instead of the content store
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the page server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Pre-render every known post to the public folder
    #[command(alias = "g")]
    Generate,

    /// List known post slugs
    List,

    /// Render one post to stdout
    Render {
        /// Slug of the post
        slug: String,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postview=debug,info"
    } else {
        "postview=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Commands::Version = cli.command {
        println!("postview version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let app = match &cli.fixture {
        Some(fixture) => PostView::with_fixture(&base_dir, fixture)?,
        None => PostView::new(&base_dir)?,
    };

    match cli.command {
        Commands::Serve { port, ip, open } => {
            tracing::info!("Starting server at http://{}:{}", ip, port);
            postview::server::start(&app, &ip, port, open).await?;
        }

        Commands::Generate => {
            tracing::info!("Generating static pages...");
            let written = app.generate().await?;
            println!("Generated {} pages into {:?}", written, app.public_dir);
        }

        Commands::List => {
            postview::commands::list::run(&app).await?;
        }

        Commands::Render { slug } => {
            let html = postview::commands::render::run(&app, &slug).await?;
            println!("{}", html);
        }

        Commands::Clean => {
            tracing::info!("Cleaning public folder...");
            app.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {}
    }

    Ok(())
}
