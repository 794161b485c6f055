//! CLI entry point for blog-starter

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-starter")]
#[command(version)]
#[command(about = "Build-time content pipeline for a Markdown blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// File name for the new post (without .md)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Build post data into the public folder
    #[command(alias = "b")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, slug)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_starter=debug,info"
    } else {
        "blog_starter=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            blog_starter::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New { title, path } => {
            let blog = blog_starter::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let file = blog_starter::commands::new::create_post(&blog, &title, path.as_deref())?;
            println!("Created: {:?}", file);
        }

        Commands::Build { watch } => {
            let blog = blog_starter::Blog::new(&base_dir)?;
            tracing::info!("Building post data...");

            let summary = blog_starter::commands::build::run(&blog)?;
            println!(
                "Built {} posts into {:?}",
                summary.posts, blog.public_dir
            );

            if watch {
                blog_starter::commands::build::watch(&blog).await?;
            }
        }

        Commands::Clean => {
            let blog = blog_starter::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let blog = blog_starter::Blog::new(&base_dir)?;
            blog_starter::commands::list::run(&blog, &r#type)?;
        }

        Commands::Version => {
            println!("blog-starter version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
