/// A storage category shown in the planner
#[derive(Debug)]
pub struct StorageCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Service ids that read or write this location
    pub services: &'static [&'static str],
    /// Path relative to the data root; empty for the root itself
    suffix: &'static str,
    /// Shown regardless of the selected services
    pub always_visible: bool,
}

impl StorageCategory {
    pub fn default_path(&self, root: &str) -> String {
        if self.suffix.is_empty() {
            root.to_string()
        } else {
            format!("{root}/{}", self.suffix)
        }
    }

    pub fn is_used_by(&self, selected: &[String]) -> bool {
        self.services
            .iter()
            .any(|service| selected.iter().any(|s| s == service))
    }
}

pub const STORAGE_CATEGORIES: &[StorageCategory] = &[
    StorageCategory {
        id: "dataRoot",
        label: "Data Root",
        description: "Base folder where all generated configs, media, and downloads live.",
        services: &[],
        suffix: "",
        always_visible: true,
    },
    StorageCategory {
        id: "configRoot",
        label: "Config Backups",
        description: "All generated docker, Authelia, and Homepage configs are written here.",
        services: &[],
        suffix: "config",
        always_visible: true,
    },
    StorageCategory {
        id: "downloads",
        label: "Downloads",
        description: "qBittorrent/SABnzbd download directory shared with the *Arr apps.",
        services: &["torrent", "usenet", "sonarr", "radarr", "lidarr", "readarr", "bazarr", "arr"],
        suffix: "downloads",
        always_visible: false,
    },
    StorageCategory {
        id: "movies",
        label: "Movies Library",
        description: "Radarr imports and Plex/Jellyfin/Emby read this directory.",
        services: &["plex", "jellyfin", "emby", "radarr", "transcode", "arr"],
        suffix: "media/movies",
        always_visible: false,
    },
    StorageCategory {
        id: "tv",
        label: "TV Library",
        description: "Sonarr imports episodic content here and media servers stream from it.",
        services: &["plex", "jellyfin", "emby", "sonarr", "transcode", "arr"],
        suffix: "media/tv",
        always_visible: false,
    },
    StorageCategory {
        id: "music",
        label: "Music Library",
        description: "Lidarr-managed music plus Plex/Jellyfin music libraries.",
        services: &["plex", "jellyfin", "lidarr"],
        suffix: "media/music",
        always_visible: false,
    },
    StorageCategory {
        id: "books",
        label: "Books & Comics",
        description: "Used by Readarr and Kavita for ebooks, manga, and comics.",
        services: &["readarr", "kavita"],
        suffix: "media/books",
        always_visible: false,
    },
    StorageCategory {
        id: "audiobooks",
        label: "Audiobooks",
        description: "Shared by Readarr and Audiobookshelf for long-form audio.",
        services: &["audiobookshelf", "readarr"],
        suffix: "media/audiobooks",
        always_visible: false,
    },
    StorageCategory {
        id: "photos",
        label: "Photo Library",
        description: "PhotoPrism watches this directory for pictures and memories.",
        services: &["photoprism"],
        suffix: "media/photos",
        always_visible: false,
    },
    StorageCategory {
        id: "transcode",
        label: "Transcode / Temp",
        description: "Used by Plex/Jellyfin transient transcodes or Tdarr worker cache.",
        services: &["plex", "jellyfin", "transcode"],
        suffix: "transcode",
        always_visible: false,
    },
];

pub fn category(id: &str) -> Option<&'static StorageCategory> {
    STORAGE_CATEGORIES.iter().find(|c| c.id == id)
}

/// Categories relevant to the current selection, in table order
pub fn visible_categories(selected: &[String]) -> Vec<&'static StorageCategory> {
    STORAGE_CATEGORIES
        .iter()
        .filter(|c| c.always_visible || c.is_used_by(selected))
        .collect()
}
