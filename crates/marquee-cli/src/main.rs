//! Marquee CLI
//!
//! Admin command-line interface for Marquee content: inspect and edit the
//! sections a managed site renders, toggle section visibility, and follow
//! live updates.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use marquee_core::auth::{AuthProvider, StaticAuth};
use marquee_core::{Config, ContentStore, ContentWriter, SqliteStore};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Marquee - content management for section-based sites")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the known content sections
    Sections,
    /// Print a section's current content
    Get {
        /// Section name (see `marquee sections`)
        section: String,
    },
    /// Replace a singleton section's content from a JSON payload
    Set {
        /// Section name
        section: String,
        /// Read the payload from a file
        #[arg(long, conflicts_with = "payload")]
        file: Option<std::path::PathBuf>,
        /// Inline JSON payload
        #[arg(long)]
        payload: Option<String>,
    },
    /// Manage project entries
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage testimonial entries
    Testimonial {
        #[command(subcommand)]
        command: TestimonialCommands,
    },
    /// Show or toggle section visibility
    Visibility {
        #[command(subcommand)]
        command: Option<VisibilityCommands>,
    },
    /// Follow a section's content live until Ctrl-C
    Watch {
        /// Section name
        section: String,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a new project entry
    #[command(alias = "add")]
    Create {
        title: String,
        #[arg(short, long, default_value = "")]
        summary: String,
        #[arg(long, default_value = "")]
        image_url: String,
        #[arg(long, default_value = "")]
        link_url: String,
        /// Display position (ascending)
        #[arg(short, long, default_value_t = 0)]
        order: i64,
    },
    /// List project entries in display order
    #[command(alias = "ls")]
    List,
    /// Delete a project entry
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand)]
enum TestimonialCommands {
    /// Create a new testimonial entry
    #[command(alias = "add")]
    Create {
        author: String,
        quote: String,
        #[arg(short, long, default_value = "")]
        role: String,
        /// Display position (ascending)
        #[arg(short, long, default_value_t = 0)]
        order: i64,
    },
    /// List testimonial entries in display order
    #[command(alias = "ls")]
    List,
    /// Delete a testimonial entry
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand, Clone)]
enum VisibilityCommands {
    /// Show the visibility map
    Show,
    /// Show or hide a section
    Set {
        /// Section name
        section: String,
        /// "on" to show, "off" to hide
        state: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, admin_uid)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return commands::config::run(command.clone(), &output);
    }

    let config = Config::load()?;
    let store: Arc<dyn ContentStore> = Arc::new(SqliteStore::open_with_config(&config)?);
    let writer = ContentWriter::new(store.clone());
    let auth = StaticAuth::admin(config.admin_uid.as_deref().unwrap_or("local-admin"));

    match cli.command {
        Commands::Sections => commands::section::list(&output),
        Commands::Get { section } => commands::section::get(store, &section, &output).await,
        Commands::Set {
            section,
            file,
            payload,
        } => {
            ensure_admin(&auth)?;
            commands::section::set(&writer, &section, file, payload, &output).await
        }
        Commands::Project { command } => match command {
            ProjectCommands::Create {
                title,
                summary,
                image_url,
                link_url,
                order,
            } => {
                ensure_admin(&auth)?;
                commands::project::create(&writer, title, summary, image_url, link_url, order, &output)
                    .await
            }
            ProjectCommands::List => commands::project::list(store, &output).await,
            ProjectCommands::Delete { id } => {
                ensure_admin(&auth)?;
                commands::project::delete(&writer, &id, &output).await
            }
        },
        Commands::Testimonial { command } => match command {
            TestimonialCommands::Create {
                author,
                quote,
                role,
                order,
            } => {
                ensure_admin(&auth)?;
                commands::testimonial::create(&writer, author, quote, role, order, &output).await
            }
            TestimonialCommands::List => commands::testimonial::list(store, &output).await,
            TestimonialCommands::Delete { id } => {
                ensure_admin(&auth)?;
                commands::testimonial::delete(&writer, &id, &output).await
            }
        },
        Commands::Visibility { command } => match command.unwrap_or(VisibilityCommands::Show) {
            VisibilityCommands::Show => commands::visibility::show(store, &output).await,
            VisibilityCommands::Set { section, state } => {
                ensure_admin(&auth)?;
                commands::visibility::set(&writer, &section, &state, &output).await
            }
        },
        Commands::Watch { section } => commands::watch::run(store, &section, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Writes require the admin capability
fn ensure_admin(auth: &dyn AuthProvider) -> Result<()> {
    if !auth.is_admin() {
        bail!("this command requires admin access");
    }
    Ok(())
}
