//! Barberbook CLI - find and book local barbers from the terminal
//!
//! This binary provides a command-line front end that can:
//! - Search the barber catalog with filters and sorting
//! - Show a barber's profile and service menu
//! - Book selected services through the Barberbook API
//! - Keep a signed-in session across runs

mod render;

use anyhow::{Context, Result};
use barberbook_core::{
    api, auth, catalog, filter, ApiClient, Availability, FilterSpec, MinRating, PriceBand,
    Provider, ServiceSelection, SessionAction, SessionStore, SortBy, User,
};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "barberbook")]
#[command(author = "Barberbook Team")]
#[command(version)]
#[command(about = "Find and book local barbers")]
#[command(long_about = "
Barberbook CLI searches nearby barbers, shows their service menus and
books appointments through the Barberbook API.

Quick start:
  1. Sign in:          barberbook login --token <TOKEN>
  2. Find a barber:    barberbook search fade --rating 4.5+ --sort rating
  3. Book services:    barberbook book 1 --service 1 --service 4
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

/// Where the barber list comes from
#[derive(Args, Clone)]
pub struct CatalogArgs {
    /// Read barbers from a JSON file instead of the bundled sample catalog
    #[arg(long, conflicts_with = "remote")]
    pub catalog: Option<PathBuf>,

    /// Fetch barbers from the API
    #[arg(long)]
    pub remote: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search barbers with filters and sorting
    #[command(alias = "ls")]
    Search {
        /// Text matched against names and specialties
        query: Option<String>,

        /// Maximum distance in miles (0.5 - 5, half-mile steps)
        #[arg(long)]
        max_distance: Option<f64>,

        /// Maximum travel time in minutes (5 - 60, five-minute steps)
        #[arg(long)]
        max_time: Option<u32>,

        /// all, available or busy
        #[arg(long)]
        availability: Option<Availability>,

        /// Minimum rating: all, 4+, 4.5+ or 4.8+
        #[arg(long)]
        rating: Option<MinRating>,

        /// Price band: all, budget, mid or premium
        #[arg(long)]
        price: Option<PriceBand>,

        /// Order by distance, time, rating or price
        #[arg(long)]
        sort: Option<SortBy>,

        #[command(flatten)]
        source: CatalogArgs,
    },

    /// Show a barber's profile and services
    Show {
        /// Barber id
        id: u32,

        #[command(flatten)]
        source: CatalogArgs,
    },

    /// Book one or more services with a barber
    Book {
        /// Barber id
        id: u32,

        /// Service id to book (repeat for several)
        #[arg(short, long = "service", required = true)]
        services: Vec<u32>,

        /// Requested time (RFC 3339, e.g. 2026-10-20T14:00:00Z)
        #[arg(long)]
        at: Option<DateTime<Utc>>,

        /// Print the booking without sending it
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        source: CatalogArgs,
    },

    /// Store an access token and sign in
    Login {
        /// Access token issued by the Barberbook API
        #[arg(long)]
        token: String,

        /// Display name (fetched from the API when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out and remove stored credentials
    #[command(alias = "signout")]
    Logout,

    /// Show sign-in status
    Status,

    /// Show configuration paths and settings
    Config,
}

/// Everything a command needs, built once the session is hydrated.
struct App {
    session: SessionStore,
    client: ApiClient,
    config: api::ApiConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("barberbook={},barberbook_core={}", log_level, log_level).into()
            }),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Session must be hydrated before the API client exists
    let credentials =
        auth::CredentialStore::open_default().context("Failed to open credential storage")?;
    let session = SessionStore::hydrate(credentials);
    let config = api::load_api_config();
    let client = ApiClient::new(&config, session.clone()).context("Failed to build HTTP client")?;
    let app = App {
        session,
        client,
        config,
    };

    match &cli.command {
        Commands::Search {
            query,
            max_distance,
            max_time,
            availability,
            rating,
            price,
            sort,
            source,
        } => {
            let mut spec = FilterSpec {
                search_text: query.clone().unwrap_or_default(),
                ..FilterSpec::default()
            };
            if let Some(miles) = max_distance {
                spec.set_max_distance(*miles);
            }
            if let Some(minutes) = max_time {
                spec.set_max_travel_time(*minutes);
            }
            spec.availability = availability.unwrap_or_default();
            spec.min_rating = rating.unwrap_or_default();
            spec.price_band = price.unwrap_or_default();
            spec.sort_by = sort.unwrap_or_default();
            cmd_search(&cli, &app, &spec, source).await
        }
        Commands::Show { id, source } => cmd_show(&cli, &app, *id, source).await,
        Commands::Book {
            id,
            services,
            at,
            dry_run,
            source,
        } => cmd_book(&cli, &app, *id, services, *at, *dry_run, source).await,
        Commands::Login { token, name, email } => {
            cmd_login(&cli, &app, token, name.clone(), email.clone()).await
        }
        Commands::Logout => cmd_logout(&cli, &app),
        Commands::Status => cmd_status(&cli, &app),
        Commands::Config => cmd_config(&cli, &app),
    }
}

async fn load_providers(app: &App, source: &CatalogArgs) -> Result<Vec<Provider>> {
    if let Some(path) = &source.catalog {
        return catalog::load_catalog(path);
    }
    if source.remote {
        return app
            .client
            .list_barbers()
            .await
            .context("Failed to fetch barbers");
    }
    Ok(catalog::sample_catalog())
}

async fn find_provider(app: &App, id: u32, source: &CatalogArgs) -> Result<Provider> {
    if source.remote {
        return app
            .client
            .get_barber(id)
            .await
            .with_context(|| format!("Failed to fetch barber {}", id));
    }
    load_providers(app, source)
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .with_context(|| format!("Barber {} not found", id))
}

async fn cmd_search(cli: &Cli, app: &App, spec: &FilterSpec, source: &CatalogArgs) -> Result<()> {
    let providers = load_providers(app, source).await?;
    let results = filter::apply(&providers, spec);

    match cli.format {
        OutputFormat::Text => {
            println!("{}", filter::summary(results.len(), &spec.search_text));
            let labels = spec.active_filter_labels();
            if !labels.is_empty() {
                println!("Filters: {}", labels.join(" · "));
            }
            println!("Sorted:  {}", spec.sort_by.short_label());
            println!();

            if results.is_empty() {
                println!("No barbers found. Try adjusting your search or filters.");
            }
            for provider in &results {
                println!("{}", render::provider_card(provider));
                println!();
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "filters": spec,
                    "active_filters": spec.active_filter_count(),
                    "count": results.len(),
                    "barbers": results,
                })
            );
        }
    }

    Ok(())
}

async fn cmd_show(cli: &Cli, app: &App, id: u32, source: &CatalogArgs) -> Result<()> {
    let provider = find_provider(app, id, source).await?;

    match cli.format {
        OutputFormat::Text => {
            print!(
                "{}",
                render::provider_profile(&provider, &ServiceSelection::new())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&provider)?);
        }
    }

    Ok(())
}

async fn cmd_book(
    cli: &Cli,
    app: &App,
    id: u32,
    service_ids: &[u32],
    at: Option<DateTime<Utc>>,
    dry_run: bool,
    source: &CatalogArgs,
) -> Result<()> {
    let provider = find_provider(app, id, source).await?;

    let mut selection = ServiceSelection::new();
    for service_id in service_ids {
        if !selection.is_selected(*service_id) {
            selection.toggle(*service_id);
        }
    }
    let booking = selection.to_booking(&provider, at)?;

    if let OutputFormat::Text = cli.format {
        print!("{}", render::provider_profile(&provider, &selection));
    }

    if dry_run {
        match cli.format {
            OutputFormat::Text => println!("\nDry run, booking not sent."),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "booking": booking,
                        "total_price": selection.total_price(&provider),
                        "total_minutes": selection.total_duration_minutes(&provider),
                        "sent": false,
                    })
                );
            }
        }
        return Ok(());
    }

    if !app.session.select().is_authenticated() {
        tracing::warn!("Not signed in, sending booking without credentials");
    }

    let confirmation = app
        .client
        .create_booking(&booking)
        .await
        .context("Booking failed")?;

    match cli.format {
        OutputFormat::Text => {
            println!();
            println!(
                "Booked with {} (booking {}, {})",
                provider.name, confirmation.booking_id, confirmation.status
            );
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "booking": booking,
                    "confirmation": confirmation,
                    "total_price": selection.total_price(&provider),
                    "total_minutes": selection.total_duration_minutes(&provider),
                    "sent": true,
                })
            );
        }
    }

    Ok(())
}

async fn cmd_login(
    cli: &Cli,
    app: &App,
    token: &str,
    name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("Token must not be empty");
    }

    app.session
        .dispatch(SessionAction::SetToken(token.to_string()))
        .context("Failed to save access token")?;

    let user = match name {
        Some(name) => Some(User {
            id: String::new(),
            name,
            email,
            phone: None,
        }),
        None => match app.client.current_user().await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Could not fetch user profile: {}", e);
                None
            }
        },
    };

    if let Some(user) = &user {
        app.session
            .dispatch(SessionAction::SetUser(user.clone()))
            .context("Failed to save user record")?;
    }

    match cli.format {
        OutputFormat::Text => match &user {
            Some(user) => println!("Signed in as {}", user.name),
            None => println!("Signed in"),
        },
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "status": "signed_in",
                    "user": user,
                })
            );
        }
    }

    Ok(())
}

fn cmd_logout(cli: &Cli, app: &App) -> Result<()> {
    let session = app.session.select();

    if !session.is_authenticated() {
        match cli.format {
            OutputFormat::Text => println!("Not signed in."),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "status": "not_signed_in" }));
            }
        }
        return Ok(());
    }

    app.session
        .dispatch(SessionAction::Clear)
        .context("Signed out, but stored credentials could not be removed")?;

    match cli.format {
        OutputFormat::Text => println!("Signed out."),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "status": "signed_out" }));
        }
    }

    Ok(())
}

fn cmd_status(cli: &Cli, app: &App) -> Result<()> {
    let session = app.session.select();
    let storage_info = app.session.credentials().storage_info();

    match cli.format {
        OutputFormat::Text => {
            if session.is_authenticated() {
                println!("Status: Signed in");
                match &session.user {
                    Some(user) => {
                        println!("Name:   {}", user.name);
                        println!("Email:  {}", user.email.as_deref().unwrap_or("-"));
                    }
                    None => println!("User:   (no profile stored)"),
                }
                println!();
                println!("Storage: {}", storage_info);
            } else {
                println!("Status: Signed out");
                println!();
                println!("Run 'barberbook login --token <TOKEN>' to sign in.");
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "authenticated": session.is_authenticated(),
                    "user": session.user,
                    "storage_info": storage_info,
                })
            );
        }
    }

    Ok(())
}

fn cmd_config(cli: &Cli, app: &App) -> Result<()> {
    let config_path = api::config::get_config_file_path_string();
    let storage_info = app.session.credentials().storage_info();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration");
            println!("=============");
            println!();
            println!("Config file:      {}", config_path);
            println!(
                "API endpoint:     {} (from {})",
                app.config.api_url, app.config.source
            );
            println!("Request timeout:  {}s", app.config.timeout.as_secs());
            println!("Credential store: {}", storage_info);
            println!();
            println!("Environment variables:");
            println!("  {} - Override API endpoint", api::config::ENV_API_URL);
            println!("  {} - Override request timeout", api::config::ENV_API_TIMEOUT);
            println!();
            println!("Example config.toml:");
            println!();
            println!("{}", api::config::generate_example_config());
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_file": config_path,
                    "api_url": app.config.api_url,
                    "api_source": app.config.source.to_string(),
                    "timeout_secs": app.config.timeout.as_secs(),
                    "credential_storage": storage_info,
                })
            );
        }
    }

    Ok(())
}
