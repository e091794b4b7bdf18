//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gazette: terminal client for the gazette article site
#[derive(Parser, Debug)]
#[command(name = "gazette")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List published articles, newest first
    Feed(FeedArgs),

    /// Show one article with its comments
    Article(ArticleArgs),

    /// Show the signed-in user's reading list
    Favorites(FavoritesArgs),

    /// Add or remove an article from favorites
    Favorite(FavoriteArgs),

    /// Comment on an article
    Comment(CommentArgs),

    /// Show the hero carousel slides
    Banner(BannerArgs),

    /// Admin tools (requires the admin role)
    Admin(AdminArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Show at most this many articles
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ArticleArgs {
    /// Article slug
    pub slug: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FavoritesArgs {
    /// Remove this article from the list before showing it
    #[arg(long)]
    pub remove: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FavoriteArgs {
    /// Article id
    pub article_id: String,
}

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Article id
    pub article_id: String,

    /// Comment text
    #[arg(long)]
    pub text: String,
}

#[derive(Args, Debug)]
pub struct BannerArgs {
    /// Rotate this many times at the configured period before exiting
    #[arg(long, default_value_t = 0)]
    pub cycles: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommands,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Generate and publish articles
    Generate {
        /// Generate a single article about this topic
        #[arg(long, conflicts_with = "count")]
        topic: Option<String>,

        /// Number of random topics to generate (defaults to admin.batch_size)
        #[arg(long)]
        count: Option<usize>,
    },

    /// List the latest articles of any status
    Recent {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an article
    Edit {
        /// Article id
        article_id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        /// draft or published
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        image_url: Option<String>,

        /// Remove the article's image
        #[arg(long, conflicts_with = "image_url")]
        clear_image: bool,
    },

    /// Delete an article and its comments
    Delete {
        /// Article id
        article_id: String,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./gazette.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
