//! Dog gallery command line
//!
//! Run with: cargo run --features cli --bin dog-gallery -- <command>
//!
//! State (session and favorites) persists in the LMDB store under
//! `GALLERY_DATA_DIR`, so a login survives between invocations.

use std::io;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use dog_gallery::{
    breed_from_url, filter_breeds, format_breed_name, DogApiClient, Feed, Gallery, GalleryConfig,
    ImageSource, LmdbStorage, Result,
};

#[derive(Parser)]
#[command(name = "dog-gallery", about = "Browse dog images and manage favorites")]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Log in as a known account
    Login { email: String },
    /// Log out
    Logout,
    /// Show the current account
    Whoami,
    /// List all accounts (admin only)
    Users,
    /// Manage favorites
    #[command(subcommand)]
    Favorites(FavoritesCmd),
    /// Fetch pages of random images
    Random {
        #[arg(long, default_value_t = 1)]
        pages: usize,
        #[arg(long)]
        breed: Option<String>,
        /// Fetch a single image instead of feed pages
        #[arg(long, conflicts_with_all = ["pages", "breed"])]
        single: bool,
    },
    /// List breeds, optionally filtered
    Breeds { query: Option<String> },
    /// List every image of a breed or one of its sub-breeds
    Breed {
        name: String,
        #[arg(long)]
        sub: Option<String>,
    },
}

#[derive(Subcommand)]
enum FavoritesCmd {
    List,
    Add {
        url: String,
        #[arg(long)]
        breed: Option<String>,
    },
    Remove { url: String },
    Toggle {
        url: String,
        #[arg(long)]
        breed: Option<String>,
    },
    Clear,
}

fn init_logging(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr);
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn favorites(gallery: &Gallery<LmdbStorage>, cmd: FavoritesCmd) -> Result<()> {
    let favs = gallery.favorites();
    if !favs.can_manage() {
        println!("Log in as an account with manage:favorites to use favorites.");
        return Ok(());
    }
    match cmd {
        FavoritesCmd::List => print_json(&favs.list()?)?,
        FavoritesCmd::Add { url, breed } => {
            let breed = breed.or_else(|| breed_from_url(&url).map(str::to_string));
            if let Some(item) = favs.add(&url, breed.as_deref())? {
                print_json(&item)?;
            }
        }
        FavoritesCmd::Remove { url } => {
            if favs.remove(&url)? {
                println!("Removed.");
            } else {
                println!("Not a favorite.");
            }
        }
        FavoritesCmd::Toggle { url, breed } => {
            let breed = breed.or_else(|| breed_from_url(&url).map(str::to_string));
            favs.toggle(&url, breed.as_deref())?;
            println!("favorite: {}", favs.is_favorite(&url)?);
        }
        FavoritesCmd::Clear => {
            favs.clear()?;
            println!("Cleared.");
        }
    }
    Ok(())
}

async fn run(cli: Cli, cfg: GalleryConfig) -> Result<()> {
    let mut gallery = Gallery::from_config(&cfg)?;
    let api = DogApiClient::from_config(&cfg);

    match cli.command {
        Command::Login { email } => {
            if gallery.login(&email)? {
                println!("Logged in as {}.", email);
            } else {
                println!("Unknown account '{}'.", email);
            }
        }
        Command::Logout => {
            gallery.logout()?;
            println!("Logged out.");
        }
        Command::Whoami => match gallery.session().actor() {
            Some(a) => println!(
                "{} <{}> ({}): {}",
                a.display_name,
                a.email,
                a.role,
                a.permissions.names().join(", ")
            ),
            None => println!("Not logged in."),
        },
        Command::Users => {
            let actors = gallery.session().list_actors();
            if actors.is_empty() {
                println!("Admin access required.");
            }
            for a in actors {
                println!(
                    "{:>3}  {:<20} {:<18} {}",
                    a.id, a.email, a.display_name, a.role
                );
            }
        }
        Command::Favorites(cmd) => favorites(&gallery, cmd)?,
        Command::Random { single: true, .. } => {
            println!("{}", api.random_image().await?);
        }
        Command::Random { pages, breed, .. } => {
            let mut feed = Feed::new(api, cfg.page_size);
            feed.set_breed(breed);
            for _ in 0..pages {
                feed.next_page().await?;
            }
            for url in feed.images() {
                println!("{}", url);
            }
        }
        Command::Breeds { query } => {
            let breeds = api.fetch_all_breeds().await?;
            for b in filter_breeds(&breeds, query.as_deref().unwrap_or("")) {
                match b.sub_breeds.len() {
                    0 => println!("{}", format_breed_name(&b.name)),
                    1 => println!("{} (1 sub-breed)", format_breed_name(&b.name)),
                    n => println!("{} ({} sub-breeds)", format_breed_name(&b.name), n),
                }
            }
        }
        Command::Breed { name, sub } => {
            let urls = match sub {
                Some(sub) => api.sub_breed_images(&name, &sub).await?,
                None => api.fetch_breed_images(&name).await?,
            };
            for url in urls {
                println!("{}", url);
            }
        }
    }
    gallery.close();
    Ok(())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let result = match GalleryConfig::from_env() {
        Ok(cfg) => run(cli, cfg).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
