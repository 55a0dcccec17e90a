use crate::app_config::AppConfig;
use crate::contact::{ContactForm, FormInput, SubmitOutcome};
use crate::domain::{Language, LocationStatus};
use crate::geolocation::{ConfiguredHost, GeolocationAcquirer};
use crate::map::{HeadlessMapLibrary, MapContainer, MapRenderer, MapRendererOptions, MapStatus, Placeholder};
use crate::preferences::PreferenceStore;
use crate::routing::OsrmRouter;
use crate::widget::LocationWidget;
use clap::{Parser, Subcommand};
use reqwest::Client;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::task;
use tracing::{info, warn};

mod app_config;
mod contact;
mod coordinate_deserializer;
mod distance;
mod domain;
mod geolocation;
mod map;
mod preferences;
mod routing;
mod widget;

#[derive(Parser, Debug)]
#[command(name = "beacon", version, about = "Location widget and contact form of the portfolio site")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Default)]
enum Command {
    /// Find the visitor, measure the distance to the reference location and draw the route
    #[default]
    Locate,
    /// Fill in and submit the contact form
    Contact,
    /// Switch between English and Indonesian
    ToggleLanguage,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let store = PreferenceStore::new(config.preferences().path());
    let language = store.load_language().await;
    info!("✅  Using language '{}' from {}", language, store.path().display());

    let client = Client::builder().user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))).build()?;

    match cli.command.unwrap_or_default() {
        Command::Locate => locate(&config, client).await?,
        Command::Contact => contact(&config, client, language).await?,
        Command::ToggleLanguage => {
            let toggled = language.toggled();
            store.save_language(toggled).await?;
            info!("🌐 Language switched from '{}' to '{}'", language, toggled);
        }
    }

    info!("👋 {} stopped", env!("CARGO_PKG_NAME"));
    Ok(())
}

async fn locate(config: &AppConfig, client: Client) -> Result<(), Box<dyn std::error::Error>> {
    let library = Arc::new(HeadlessMapLibrary::new(client.clone()));
    let container = MapContainer::new(config.map().container());
    let renderer = Arc::new(MapRenderer::open(library, container, MapRendererOptions::from_config(config)).await);
    match renderer.placeholder() {
        Some(Placeholder::Unavailable) => warn!("⚠️ Map is unavailable: {:?}", renderer.last_error()),
        Some(Placeholder::Loading) => info!("🗺️ Map is still loading"),
        None => info!("✅  Initialized map"),
    }

    let listener = renderer.clone();
    let surface_events = task::spawn(async move {
        listener.listen().await;
    });

    let acquirer = GeolocationAcquirer::new(Arc::new(ConfiguredHost::new(config.host())), config.geolocation().clone());
    let router = Arc::new(OsrmRouter::new(client, config.routing()));
    let widget = Arc::new(LocationWidget::new(acquirer, renderer, router, config.reference().location()));

    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    let mut state = widget.locate().await;
    if let Some(error) = state.error.filter(|e| e.is_retryable()) {
        info!("🔁 Locating again after: {}", error);
        state = widget.locate().await;
    }

    match state.status {
        LocationStatus::Acquired => {
            if let Some(distance) = widget.distance_label() {
                info!("📍 You are {} from {}", distance, config.reference().label());
            }
            widget.renderer().center_on_user();

            widget.set_tracking(true);
            match widget.spawn_tracking().await? {
                Some(route) => info!("🛣️ Route has {} points ({})", route.path.len(), route.source_mode),
                None => warn!("⚠️ No route was drawn"),
            }
        }
        LocationStatus::Failed => {
            if let Some(error) = state.error {
                warn!(retryable = error.is_retryable(), "⚠️ {}", error.user_message());
            }
        }
        LocationStatus::Idle | LocationStatus::Acquiring => warn!("⚠️ Location is unknown"),
    }

    let map = widget.renderer();
    info!(
        status = ?widget.state().status,
        ready = map.status() == MapStatus::Ready,
        attempted = ?map.attempted_tile_servers(),
        active = ?map.active_tile_server(),
        user = ?map.user_location(),
        route_points = map.displayed_route().map(|route| route.path.len()),
        "🗺️ Map summary"
    );

    widget.unmount();
    surface_events.await?;
    Ok(())
}

async fn contact(config: &AppConfig, client: Client, language: Language) -> Result<(), Box<dyn std::error::Error>> {
    let form = ContactForm::from_config(config.contact(), client);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let (name, email, subject, message) = match language {
        Language::En => ("Name", "Email", "Subject", "Message"),
        Language::Id => ("Nama", "Email", "Subjek", "Pesan"),
    };

    let input = FormInput {
        name: prompt(&mut lines, name).await?,
        email: prompt(&mut lines, email).await?,
        subject: prompt(&mut lines, subject).await?,
        message: prompt(&mut lines, message).await?,
        honeypot: String::new(),
    };

    match form.submit(&input).await {
        Ok(SubmitOutcome::Sent) => info!("✉️ Message sent"),
        Ok(SubmitOutcome::Fallback(link)) => {
            info!("✉️ Open this link to send the message from your mail client");
            println!("{}", link);
        }
        Err(e) => warn!("⚠️ Message was not sent: {}", e),
    }

    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> std::io::Result<String> {
    println!("{}:", label);
    Ok(lines.next_line().await?.unwrap_or_default())
}
