/// Grouping used by the stack selection list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCategory {
    MediaServer,
    Management,
    Downloads,
    Requests,
    Monitoring,
    Utility,
}

impl ServiceCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::MediaServer => "Media Servers",
            ServiceCategory::Management => "Media Management",
            ServiceCategory::Downloads => "Downloads",
            ServiceCategory::Requests => "Request & Discovery",
            ServiceCategory::Monitoring => "Monitoring & Stats",
            ServiceCategory::Utility => "Utility Apps",
        }
    }
}

#[derive(Debug)]
pub struct ServiceInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: ServiceCategory,
}

const fn service(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: ServiceCategory,
) -> ServiceInfo {
    ServiceInfo {
        id,
        name,
        description,
        category,
    }
}

use ServiceCategory::*;

/// Every service id the wizard knows how to deploy, in display order
pub const SERVICES: &[ServiceInfo] = &[
    service("plex", "Plex", "Premium media server with polished apps for every device", MediaServer),
    service("jellyfin", "Jellyfin", "Free, open-source media server with no account required", MediaServer),
    service("emby", "Emby", "Media server with live TV and DVR support", MediaServer),
    service("arr", "*Arr Stack", "Sonarr + Radarr + Prowlarr for automated media management", Management),
    service("sonarr", "Sonarr", "Automated TV series downloading and management", Management),
    service("radarr", "Radarr", "Automated movie downloading and management", Management),
    service("prowlarr", "Prowlarr", "Indexer manager that syncs with all *Arr apps", Management),
    service("bazarr", "Bazarr", "Automatic subtitle downloading for movies and TV", Management),
    service("lidarr", "Lidarr", "Music collection manager and downloader", Management),
    service("readarr", "Readarr", "Book and audiobook manager", Management),
    service("transcode", "Tdarr", "Distributed transcoding to optimize your library", Management),
    service("torrent", "qBittorrent", "Torrent client with web UI for downloading", Downloads),
    service("usenet", "SABnzbd", "Usenet downloader for fast, secure downloads", Downloads),
    service("vpn", "Gluetun VPN", "VPN container to protect your download traffic", Downloads),
    service("overseerr", "Overseerr", "Beautiful request management for users", Requests),
    service("ombi", "Ombi", "Request management with newsletter features", Requests),
    service("petio", "Petio", "Request manager with smart recommendations", Requests),
    service("stats", "Tautulli", "Detailed statistics and monitoring for Plex", Monitoring),
    service("notify", "Notifiarr", "Unified notifications for all your services", Monitoring),
    service("mealie", "Mealie", "Recipe manager and meal planner", Utility),
    service("kavita", "Kavita", "Comics, manga, and ebook reader", Utility),
    service("audiobookshelf", "Audiobookshelf", "Audiobook and podcast server", Utility),
    service("photoprism", "PhotoPrism", "AI-powered photo management", Utility),
    service("filebrowser", "File Browser", "Web-based file management", Utility),
];

pub fn service_info(id: &str) -> Option<&'static ServiceInfo> {
    SERVICES.iter().find(|s| s.id == id)
}

/// Display name for an id, falling back to the id itself
pub fn service_name(id: &str) -> &str {
    service_info(id).map(|s| s.name).unwrap_or(id)
}
