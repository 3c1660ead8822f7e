use crate::setup::{ConfigPatch, SetupStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// A preset stack offered on the welcome screen
#[derive(Debug)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub services: &'static [&'static str],
    pub highlights: &'static [&'static str],
    pub puid: &'static str,
    pub pgid: &'static str,
}

impl Template {
    pub fn patch(&self) -> ConfigPatch {
        ConfigPatch::ids(self.puid, self.pgid)
    }

    /// Load this preset into `store`
    pub fn apply(&self, store: &mut SetupStore) {
        let services = self.services.iter().map(|s| s.to_string()).collect();
        store.load_template(services, Some(self.patch()));
    }
}

pub const TEMPLATES: &[Template] = &[
    Template {
        id: "plex-enthusiast",
        name: "Plex Enthusiast",
        description: "Complete Plex setup with automation, downloads, and monitoring",
        difficulty: Difficulty::Beginner,
        services: &["plex", "arr", "torrent", "vpn", "notify", "stats"],
        highlights: &[
            "Fully automated TV & movie downloads",
            "VPN protection for all downloads",
            "Real-time usage statistics",
            "Push notifications for new content",
        ],
        puid: "1000",
        pgid: "1000",
    },
    Template {
        id: "foss-stack",
        name: "FOSS Stack",
        description: "Free and open-source media server with Jellyfin",
        difficulty: Difficulty::Beginner,
        services: &["jellyfin", "arr", "torrent", "vpn"],
        highlights: &[
            "100% free, no subscriptions needed",
            "No account required for Jellyfin",
            "Full automation with *Arr stack",
            "Privacy-focused with VPN",
        ],
        puid: "1000",
        pgid: "1000",
    },
    Template {
        id: "power-user",
        name: "Power User",
        description: "Everything enabled - for advanced users who want it all",
        difficulty: Difficulty::Advanced,
        services: &["plex", "jellyfin", "arr", "torrent", "vpn", "transcode", "notify", "stats"],
        highlights: &[
            "Dual media servers (Plex + Jellyfin)",
            "Hardware-accelerated transcoding",
            "Complete automation suite",
            "Advanced monitoring & notifications",
        ],
        puid: "1000",
        pgid: "1000",
    },
    Template {
        id: "minimal",
        name: "Minimal Setup",
        description: "Just the basics - media server without automation",
        difficulty: Difficulty::Beginner,
        services: &["plex"],
        highlights: &[
            "Simple one-service setup",
            "Stream existing media library",
            "Low resource usage",
            "Easy to maintain",
        ],
        puid: "1000",
        pgid: "1000",
    },
    Template {
        id: "streaming-beast",
        name: "Streaming Beast",
        description: "Optimized for transcoding and multiple streams",
        difficulty: Difficulty::Intermediate,
        services: &["plex", "transcode", "arr", "stats"],
        highlights: &[
            "Pre-transcode library for smooth playback",
            "Handle multiple simultaneous streams",
            "Monitor performance with Tautulli",
            "Automated content acquisition",
        ],
        puid: "1000",
        pgid: "1000",
    },
    Template {
        id: "privacy-focused",
        name: "Privacy Focused",
        description: "VPN-first setup with secure downloads",
        difficulty: Difficulty::Intermediate,
        services: &["jellyfin", "torrent", "vpn", "arr"],
        highlights: &[
            "All downloads through VPN tunnel",
            "No external accounts required",
            "No telemetry or tracking",
            "ISP cannot see your activity",
        ],
        puid: "1000",
        pgid: "1000",
    },
];

pub fn template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}
