//! Supported video services
//!
//! Two pieces live here:
//! - [`ServiceKind::detect`]: pure URL → service detection against the
//!   domains of each known service
//! - [`SupportedServices`]: the list of services the worker currently
//!   accepts, loaded once at start-up. "Not loaded yet" and "loaded but
//!   empty" are distinct states.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Longest URL accepted for detection
pub const MAX_URL_LENGTH: usize = 500;

/// A video service the worker knows how to extract from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// youtube.com, youtu.be, youtube-nocookie.com
    YouTube,
    /// bilibili.com, b23.tv
    Bilibili,
    /// vimeo.com
    Vimeo,
    /// twitch.tv
    Twitch,
    /// instagram.com
    Instagram,
    /// tiktok.com
    TikTok,
}

struct ServicePattern {
    kind: ServiceKind,
    regex: Regex,
}

fn domain_pattern(domains: &[&str]) -> String {
    let alternatives = domains
        .iter()
        .map(|d| regex::escape(d))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?i)^(https?://)?([a-z0-9-]+\.)*({})(:\d+)?/.+$", alternatives)
}

static PATTERNS: LazyLock<Vec<ServicePattern>> = LazyLock::new(|| {
    ServiceKind::ALL
        .iter()
        .filter_map(|&kind| {
            // Patterns are built from escaped literals; a failure here would be a bug
            // in the domain table, so such a service is simply never detected.
            Regex::new(&domain_pattern(kind.domains()))
                .ok()
                .map(|regex| ServicePattern { kind, regex })
        })
        .collect()
});

impl ServiceKind {
    /// Every known service
    pub const ALL: [ServiceKind; 6] = [
        ServiceKind::YouTube,
        ServiceKind::Bilibili,
        ServiceKind::Vimeo,
        ServiceKind::Twitch,
        ServiceKind::Instagram,
        ServiceKind::TikTok,
    ];

    /// Identifier used by the worker's service list
    pub fn id(&self) -> &'static str {
        match self {
            ServiceKind::YouTube => "youtube",
            ServiceKind::Bilibili => "bilibili",
            ServiceKind::Vimeo => "vimeo",
            ServiceKind::Twitch => "twitch",
            ServiceKind::Instagram => "instagram",
            ServiceKind::TikTok => "tiktok",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::YouTube => "YouTube",
            ServiceKind::Bilibili => "Bilibili",
            ServiceKind::Vimeo => "Vimeo",
            ServiceKind::Twitch => "Twitch",
            ServiceKind::Instagram => "Instagram",
            ServiceKind::TikTok => "TikTok",
        }
    }

    /// Domains that identify the service
    pub fn domains(&self) -> &'static [&'static str] {
        match self {
            ServiceKind::YouTube => &["youtube.com", "youtu.be", "youtube-nocookie.com"],
            ServiceKind::Bilibili => &["bilibili.com", "b23.tv"],
            ServiceKind::Vimeo => &["vimeo.com"],
            ServiceKind::Twitch => &["twitch.tv"],
            ServiceKind::Instagram => &["instagram.com"],
            ServiceKind::TikTok => &["tiktok.com"],
        }
    }

    /// Look up a service by its worker identifier
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id.trim()))
    }

    /// Detect which service a URL belongs to
    ///
    /// The URL must point below the service's domain (a bare domain has no
    /// video to fetch). Over-long URLs are rejected outright.
    pub fn detect(url: &str) -> Option<Self> {
        let url = url.trim();
        if url.is_empty() || url.len() > MAX_URL_LENGTH {
            return None;
        }
        PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(url))
            .map(|pattern| pattern.kind)
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The services the worker accepts, as loaded at start-up
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "services", rename_all = "snake_case")]
pub enum SupportedServices {
    /// The list has not been fetched (or fetching failed)
    #[default]
    NotLoaded,
    /// The worker's list, lowercase identifiers
    Loaded(Vec<String>),
}

impl SupportedServices {
    /// Whether the list was loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self, SupportedServices::Loaded(_))
    }

    /// Whether the worker accepts the service
    ///
    /// `None` while the list is not loaded: the caller decides whether an
    /// unknown answer blocks the user.
    pub fn allows(&self, kind: ServiceKind) -> Option<bool> {
        match self {
            SupportedServices::NotLoaded => None,
            SupportedServices::Loaded(ids) => Some(ids.iter().any(|id| id == kind.id())),
        }
    }

    /// Known services the worker accepts; empty while not loaded
    pub fn kinds(&self) -> Vec<ServiceKind> {
        match self {
            SupportedServices::NotLoaded => Vec::new(),
            SupportedServices::Loaded(ids) => {
                ids.iter().filter_map(|id| ServiceKind::from_id(id)).collect()
            }
        }
    }
}
