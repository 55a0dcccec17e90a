use crate::domain::{Coordinate, TileServer};
use crate::geolocation::PositionOptions;
use config::{Config, ConfigError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    reference: Reference,
    geolocation: PositionOptions,
    host: Host,
    map: Map,
    routing: Routing,
    contact: Contact,
    preferences: Preferences,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("BEACON").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn geolocation(&self) -> &PositionOptions {
        &self.geolocation
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn routing(&self) -> &Routing {
        &self.routing
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }
}

/// The fixed location the widget measures and routes towards.
#[derive(Clone, Debug, Deserialize)]
pub struct Reference {
    label: String,
    region: String,
    location: Coordinate,
    zoom: u8,
}

impl Reference {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }
}

#[derive(Debug, Deserialize)]
pub struct Host {
    origin: String,
    #[serde(default = "enabled")]
    supported: bool,
    #[serde(default = "enabled")]
    permission_granted: bool,
    position: Option<Coordinate>,
}

fn enabled() -> bool {
    true
}

impl Host {
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn supported(&self) -> bool {
        self.supported
    }

    pub fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.position
    }
}

#[derive(Debug, Deserialize)]
pub struct Map {
    container: String,
    max_zoom: u8,
    tiles: Vec<TileServer>,
}

impl Map {
    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    pub fn tiles(&self) -> &[TileServer] {
        &self.tiles
    }
}

#[derive(Debug, Deserialize)]
pub struct Routing {
    url: String,
    profile: String,
    fit_padding_px: u32,
    #[serde(with = "humantime_serde")]
    request_timeout: Duration,
}

impl Routing {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn fit_padding_px(&self) -> u32 {
        self.fit_padding_px
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

#[derive(Debug, Deserialize)]
pub struct Contact {
    service_id: Option<String>,
    template_id: Option<String>,
    public_key: Option<String>,
    api_url: String,
    recipient: String,
    #[serde(with = "humantime_serde")]
    min_fill_time: Duration,
}

/// Everything needed to send through EmailJS.
#[derive(Clone, PartialEq, Debug)]
pub struct EmailJsCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl Contact {
    /// Returns the EmailJS credentials, or `None` when any of them is missing or blank.
    pub fn emailjs(&self) -> Option<EmailJsCredentials> {
        let present = |value: &Option<String>| value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

        Some(EmailJsCredentials {
            service_id: present(&self.service_id)?,
            template_id: present(&self.template_id)?,
            public_key: present(&self.public_key)?,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn min_fill_time(&self) -> Duration {
        self.min_fill_time
    }
}

#[derive(Debug, Deserialize)]
pub struct Preferences {
    path: String,
}

impl Preferences {
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                reference: Reference {
                    label: "Bogor, Indonesia".to_string(),
                    region: "West Java Province".to_string(),
                    location: Coordinate::new(-6.5944, 106.7886).unwrap(),
                    zoom: 11,
                },
                geolocation: PositionOptions::default(),
                host: Host {
                    origin: "http://localhost:3000".to_string(),
                    supported: true,
                    permission_granted: true,
                    position: Some(Coordinate::new(-6.2088, 106.8456).unwrap()),
                },
                map: Map {
                    container: "location-map".to_string(),
                    max_zoom: 19,
                    tiles: vec![TileServer {
                        name: "OpenStreetMap".to_string(),
                        url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                        attribution: "© OpenStreetMap".to_string(),
                    }],
                },
                routing: Routing {
                    url: "https://router.url".to_string(),
                    profile: "driving".to_string(),
                    fit_padding_px: 60,
                    request_timeout: Duration::from_secs(5),
                },
                contact: Contact {
                    service_id: None,
                    template_id: None,
                    public_key: None,
                    api_url: "https://emailjs.url/api/v1.0/email/send".to_string(),
                    recipient: "owner@example.com".to_string(),
                    min_fill_time: Duration::from_secs(3),
                },
                preferences: Preferences {
                    path: "preferences.json".to_string(),
                },
            },
        }
    }

    pub fn host_position(mut self, position: Option<Coordinate>) -> Self {
        self.config.host.position = position;
        self
    }

    pub fn host_permission_granted(mut self, granted: bool) -> Self {
        self.config.host.permission_granted = granted;
        self
    }

    pub fn tiles(mut self, tiles: Vec<TileServer>) -> Self {
        self.config.map.tiles = tiles;
        self
    }

    pub fn routing_url(mut self, url: String) -> Self {
        self.config.routing.url = url;
        self
    }

    pub fn emailjs(mut self, api_url: String, credentials: Option<EmailJsCredentials>) -> Self {
        self.config.contact.api_url = api_url;
        self.config.contact.service_id = credentials.as_ref().map(|c| c.service_id.clone());
        self.config.contact.template_id = credentials.as_ref().map(|c| c.template_id.clone());
        self.config.contact.public_key = credentials.map(|c| c.public_key);
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
