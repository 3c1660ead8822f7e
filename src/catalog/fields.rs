/// A value the user can set before the containers first start
#[derive(Debug)]
pub struct ServiceField {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Pre-install fields and the follow-up shown after deployment
#[derive(Debug)]
pub struct ServiceFields {
    pub fields: &'static [ServiceField],
    pub post_install_note: &'static str,
}

const NONE: &[ServiceField] = &[];

const fn note(post_install_note: &'static str) -> ServiceFields {
    ServiceFields {
        fields: NONE,
        post_install_note,
    }
}

static PLEX: ServiceFields = ServiceFields {
    fields: &[ServiceField {
        key: "ALLOWED_NETWORKS",
        default: "192.168.1.0/24",
        description: "Your local network range for direct connections",
    }],
    post_install_note: "After install: Get your Plex Claim token from plex.tv/claim and add media libraries",
};

static TORRENT: ServiceFields = ServiceFields {
    fields: &[ServiceField {
        key: "LAN_NETWORK",
        default: "192.168.1.0/24",
        description: "Your local network for direct access to qBittorrent",
    }],
    post_install_note: "After install: Configure download paths and connect to your *Arr apps",
};

static JELLYFIN: ServiceFields =
    note("After install: Create admin account and add media libraries through the web UI");
static EMBY: ServiceFields =
    note("After install: Create admin account, add libraries, and optionally set up Emby Premiere");
static ARR: ServiceFields = note(
    "After install: API keys are auto-generated. Find them in Settings → General for each *Arr app",
);
static LIDARR: ServiceFields = note(
    "After install: Add your music root folder, connect indexers, and set up a download client",
);
static READARR: ServiceFields =
    note("After install: Add root folders for books/audiobooks and connect to Calibre if desired");
static TRANSCODE: ServiceFields =
    note("After install: Configure transcoding rules and connect to your media server");
static USENET: ServiceFields = note(
    "After install: Add your Usenet provider credentials and configure categories for *Arr apps",
);
static VPN: ServiceFields =
    note("After install: Add your VPN provider credentials to the .env file (we'll guide you)");
static OVERSEERR: ServiceFields =
    note("After install: Sign in with Plex, connect to Sonarr/Radarr, and invite users");
static OMBI: ServiceFields = note(
    "After install: Connect to your media server and *Arr apps, then configure user access",
);
static PETIO: ServiceFields =
    note("After install: Connect to Plex and *Arr apps for request management");
static STATS: ServiceFields = note("After install: Connect to your Plex server using your Plex token");
static NOTIFY: ServiceFields =
    note("After install: Create a Notifiarr account and add the API key to each *Arr app");
static MEALIE: ServiceFields =
    note("After install: Create your account, import recipes from URLs, and set up meal plans");
static KAVITA: ServiceFields =
    note("After install: Create admin account, add library paths for comics/manga/books");
static AUDIOBOOKSHELF: ServiceFields = note(
    "After install: Create account, add audiobook/podcast library folders, and import metadata",
);
static PHOTOPRISM: ServiceFields =
    note("After install: Set admin password, add photo folders, and let indexing complete");
static FILEBROWSER: ServiceFields =
    note("After install: Default login is admin/admin - change it immediately!");

/// Field definitions for a service; unknown ids have none
pub fn service_fields(id: &str) -> Option<&'static ServiceFields> {
    let fields = match id {
        "plex" => &PLEX,
        "jellyfin" => &JELLYFIN,
        "emby" => &EMBY,
        "arr" => &ARR,
        "lidarr" => &LIDARR,
        "readarr" => &READARR,
        "transcode" => &TRANSCODE,
        "torrent" => &TORRENT,
        "usenet" => &USENET,
        "vpn" => &VPN,
        "overseerr" => &OVERSEERR,
        "ombi" => &OMBI,
        "petio" => &PETIO,
        "stats" => &STATS,
        "notify" => &NOTIFY,
        "mealie" => &MEALIE,
        "kavita" => &KAVITA,
        "audiobookshelf" => &AUDIOBOOKSHELF,
        "photoprism" => &PHOTOPRISM,
        "filebrowser" => &FILEBROWSER,
        _ => return None,
    };
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_fields_default_to_home_lan() {
        let plex = service_fields("plex").expect("plex fields");
        assert_eq!(plex.fields[0].key, "ALLOWED_NETWORKS");
        assert_eq!(plex.fields[0].default, "192.168.1.0/24");
        assert_eq!(service_fields("torrent").unwrap().fields[0].key, "LAN_NETWORK");
        assert!(service_fields("kavita").unwrap().fields.is_empty());
        assert!(service_fields("sonarr").is_none());
    }
}
