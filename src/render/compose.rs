use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;

const NETWORK: &str = "mediastack";
const VPN_CONTAINER: &str = "gluetun";
const TORRENT_CONTAINER: &str = "qbittorrent";

/// One entry under `services:` in docker-compose.yml
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposeService {
    pub image: String,
    pub container_name: String,
    pub restart: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cap_add: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ComposeNetwork {
    name: &'static str,
    driver: &'static str,
}

#[derive(Debug, Serialize)]
struct ComposeFile {
    version: &'static str,
    networks: BTreeMap<&'static str, ComposeNetwork>,
    services: serde_yaml::Mapping,
}

/// Static description of a container the generator knows
struct Definition {
    name: &'static str,
    image: &'static str,
    environment: &'static [&'static str],
    volumes: &'static [&'static str],
    ports: &'static [&'static str],
    cap_add: &'static [&'static str],
    devices: &'static [&'static str],
}

const LINUXSERVER_ENV: &[&str] = &["PUID=${PUID}", "PGID=${PGID}", "TZ=${TIMEZONE}"];

const fn linuxserver(
    name: &'static str,
    image: &'static str,
    volumes: &'static [&'static str],
    ports: &'static [&'static str],
) -> Definition {
    Definition {
        name,
        image,
        environment: LINUXSERVER_ENV,
        volumes,
        ports,
        cap_add: &[],
        devices: &[],
    }
}

const DEFINITIONS: &[Definition] = &[
    Definition {
        name: "plex",
        image: "lscr.io/linuxserver/plex:latest",
        environment: &[
            "PUID=${PUID}",
            "PGID=${PGID}",
            "TZ=${TIMEZONE}",
            "VERSION=docker",
            "PLEX_CLAIM=${PLEX_CLAIM}",
        ],
        volumes: &[
            "${CONFIG_ROOT}/plex:/config",
            "${MOVIES_PATH}:/movies",
            "${TV_SHOWS_PATH}:/tv",
            "${TRANSCODE_PATH}:/transcode",
        ],
        ports: &["32400:32400"],
        cap_add: &[],
        devices: &[],
    },
    linuxserver(
        "jellyfin",
        "lscr.io/linuxserver/jellyfin:latest",
        &[
            "${CONFIG_ROOT}/jellyfin:/config",
            "${MOVIES_PATH}:/data/movies",
            "${TV_SHOWS_PATH}:/data/tvshows",
            "${TRANSCODE_PATH}:/cache",
        ],
        &["8096:8096"],
    ),
    linuxserver(
        "sonarr",
        "lscr.io/linuxserver/sonarr:latest",
        &[
            "${CONFIG_ROOT}/sonarr:/config",
            "${TV_SHOWS_PATH}:/tv",
            "${DOWNLOADS_PATH}:/downloads",
        ],
        &["8989:8989"],
    ),
    linuxserver(
        "radarr",
        "lscr.io/linuxserver/radarr:latest",
        &[
            "${CONFIG_ROOT}/radarr:/config",
            "${MOVIES_PATH}:/movies",
            "${DOWNLOADS_PATH}:/downloads",
        ],
        &["7878:7878"],
    ),
    linuxserver(
        "prowlarr",
        "lscr.io/linuxserver/prowlarr:latest",
        &["${CONFIG_ROOT}/prowlarr:/config"],
        &["9696:9696"],
    ),
    Definition {
        name: TORRENT_CONTAINER,
        image: "lscr.io/linuxserver/qbittorrent:latest",
        environment: &["PUID=${PUID}", "PGID=${PGID}", "TZ=${TIMEZONE}", "WEBUI_PORT=8080"],
        volumes: &["${CONFIG_ROOT}/qbittorrent:/config", "${DOWNLOADS_PATH}:/downloads"],
        ports: &["8080:8080", "6881:6881", "6881:6881/udp"],
        cap_add: &[],
        devices: &[],
    },
    Definition {
        name: VPN_CONTAINER,
        image: "qmcgaw/gluetun:latest",
        environment: &[
            "VPN_SERVICE_PROVIDER=custom",
            "VPN_TYPE=wireguard",
            "WIREGUARD_PRIVATE_KEY=${WIREGUARD_PRIVATE_KEY}",
            "WIREGUARD_ADDRESSES=${WIREGUARD_ADDRESSES}",
            "TZ=${TIMEZONE}",
        ],
        volumes: &["${CONFIG_ROOT}/gluetun:/gluetun"],
        // qBittorrent's ports are published here when it shares gluetun's network
        ports: &[
            "8888:8888/tcp",
            "8388:8388/tcp",
            "8388:8388/udp",
            "8080:8080",
            "6881:6881",
            "6881:6881/udp",
        ],
        cap_add: &["NET_ADMIN"],
        devices: &["/dev/net/tun:/dev/net/tun"],
    },
    linuxserver(
        "tautulli",
        "lscr.io/linuxserver/tautulli:latest",
        &["${CONFIG_ROOT}/tautulli:/config"],
        &["8181:8181"],
    ),
    Definition {
        name: "tdarr",
        image: "ghcr.io/haveagitgat/tdarr:latest",
        environment: &[
            "PUID=${PUID}",
            "PGID=${PGID}",
            "TZ=${TIMEZONE}",
            "serverIP=0.0.0.0",
            "serverPort=8266",
        ],
        volumes: &[
            "${CONFIG_ROOT}/tdarr/server:/app/server",
            "${CONFIG_ROOT}/tdarr/configs:/app/configs",
            "${MOVIES_PATH}:/media/movies",
            "${TV_SHOWS_PATH}:/media/tv",
            "${TRANSCODE_PATH}:/temp",
        ],
        ports: &["8265:8265", "8266:8266"],
        cap_add: &[],
        devices: &[],
    },
    Definition {
        name: "notifiarr",
        image: "golift/notifiarr:latest",
        environment: &["TZ=${TIMEZONE}", "DN_API_KEY=${NOTIFIARR_API_KEY}"],
        volumes: &["${CONFIG_ROOT}/notifiarr:/config"],
        ports: &[],
        cap_add: &[],
        devices: &[],
    },
    linuxserver(
        "mealie",
        "ghcr.io/mealie-recipes/mealie:latest",
        &["${CONFIG_ROOT}/mealie:/app/data"],
        &["9000:9000"],
    ),
    linuxserver(
        "kavita",
        "lscr.io/linuxserver/kavita:latest",
        &["${CONFIG_ROOT}/kavita:/config", "${BOOKS_PATH}:/books"],
        &["5000:5000"],
    ),
    linuxserver(
        "audiobookshelf",
        "lscr.io/linuxserver/audiobookshelf:latest",
        &[
            "${CONFIG_ROOT}/audiobookshelf:/config",
            "${AUDIOBOOKS_PATH}:/audiobooks",
            "${AUDIOBOOKS_PATH}:/podcasts",
        ],
        &["13378:13378"],
    ),
    Definition {
        name: "photoprism",
        image: "lscr.io/linuxserver/photoprism:latest",
        environment: &[
            "PUID=${PUID}",
            "PGID=${PGID}",
            "TZ=${TIMEZONE}",
            "PHOTOPRISM_ADMIN_PASSWORD=${PHOTOPRISM_ADMIN_PASSWORD}",
        ],
        volumes: &["${CONFIG_ROOT}/photoprism:/config", "${PHOTOS_PATH}:/photos"],
        ports: &["2342:2342"],
        cap_add: &[],
        devices: &[],
    },
];

/// Containers each selectable service id expands to. Ids without an entry
/// produce no containers.
pub fn containers_for(service: &str) -> &'static [&'static str] {
    match service {
        "plex" => &["plex"],
        "jellyfin" => &["jellyfin"],
        "arr" => &["sonarr", "radarr", "prowlarr"],
        "torrent" => &[TORRENT_CONTAINER],
        "vpn" => &[VPN_CONTAINER],
        "stats" => &["tautulli"],
        "transcode" => &["tdarr"],
        "notify" => &["notifiarr"],
        "mealie" => &["mealie"],
        "kavita" => &["kavita"],
        "audiobookshelf" => &["audiobookshelf"],
        "photoprism" => &["photoprism"],
        _ => &[],
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Definition {
    fn service(&self) -> ComposeService {
        ComposeService {
            image: self.image.to_string(),
            container_name: self.name.to_string(),
            restart: "unless-stopped".to_string(),
            environment: strings(self.environment),
            volumes: strings(self.volumes),
            ports: strings(self.ports),
            cap_add: strings(self.cap_add),
            devices: strings(self.devices),
            depends_on: Vec::new(),
            network_mode: None,
            networks: vec![NETWORK.to_string()],
        }
    }
}

/// Expand the selection into concrete containers, in selection order
pub fn compose_services(selected: &[String]) -> Vec<ComposeService> {
    let mut names: Vec<&str> = Vec::new();
    for service in selected {
        for container in containers_for(service).iter().copied() {
            if !names.contains(&container) {
                names.push(container);
            }
        }
    }
    let behind_vpn = names.contains(&VPN_CONTAINER);

    names
        .iter()
        .filter_map(|name| DEFINITIONS.iter().find(|d| d.name == *name))
        .map(|definition| {
            let mut service = definition.service();
            if behind_vpn && definition.name == TORRENT_CONTAINER {
                service.ports.clear();
                service.networks.clear();
                service.network_mode = Some(format!("service:{VPN_CONTAINER}"));
                service.depends_on = vec![VPN_CONTAINER.to_string()];
            }
            service
        })
        .collect()
}

/// Render docker-compose.yml for the selected services
pub fn render_compose(selected: &[String]) -> Result<String> {
    let mut services = serde_yaml::Mapping::new();
    for service in compose_services(selected) {
        let key = serde_yaml::Value::String(service.container_name.clone());
        services.insert(key, serde_yaml::to_value(&service)?);
    }

    let file = ComposeFile {
        version: "3.8",
        networks: BTreeMap::from([(
            NETWORK,
            ComposeNetwork {
                name: "${DOCKER_NETWORK}",
                driver: "bridge",
            },
        )]),
        services,
    };
    Ok(serde_yaml::to_string(&file)?)
}
