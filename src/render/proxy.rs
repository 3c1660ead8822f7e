use serde::Serialize;

use crate::error::Result;

#[derive(Serialize)]
struct Authelia<'a> {
    theme: &'static str,
    default_redirection_url: String,
    server: Server,
    log: Log,
    totp: Totp<'a>,
    authentication_backend: AuthBackend,
    access_control: AccessControl,
    session: Session<'a>,
    storage: Storage,
    notifier: Notifier,
}

#[derive(Serialize)]
struct Server {
    host: &'static str,
    port: u16,
}

#[derive(Serialize)]
struct Log {
    level: &'static str,
}

#[derive(Serialize)]
struct Totp<'a> {
    issuer: &'a str,
}

#[derive(Serialize)]
struct AuthBackend {
    file: PathOnly,
}

#[derive(Serialize)]
struct PathOnly {
    path: &'static str,
}

#[derive(Serialize)]
struct AccessControl {
    default_policy: &'static str,
    rules: Vec<AccessRule>,
}

#[derive(Serialize)]
struct AccessRule {
    domain: String,
    policy: &'static str,
}

#[derive(Serialize)]
struct Session<'a> {
    name: &'static str,
    domain: &'a str,
    expiration: &'static str,
    inactivity: &'static str,
    remember_me_duration: &'static str,
    redis: Redis,
}

#[derive(Serialize)]
struct Redis {
    host: &'static str,
    port: u16,
    password: &'static str,
}

#[derive(Serialize)]
struct Storage {
    encryption_key: &'static str,
    local: PathOnly,
}

#[derive(Serialize)]
struct Notifier {
    filesystem: FileNotifier,
}

#[derive(Serialize)]
struct FileNotifier {
    filename: &'static str,
}

pub fn render_authelia(domain: &str) -> Result<String> {
    let config = Authelia {
        theme: "dark",
        default_redirection_url: format!("https://{domain}"),
        server: Server {
            host: "0.0.0.0",
            port: 9091,
        },
        log: Log { level: "info" },
        totp: Totp { issuer: domain },
        authentication_backend: AuthBackend {
            file: PathOnly {
                path: "/config/users_database.yml",
            },
        },
        access_control: AccessControl {
            default_policy: "deny",
            rules: vec![AccessRule {
                domain: format!("*.{domain}"),
                policy: "two_factor",
            }],
        },
        session: Session {
            name: "authelia_session",
            domain,
            expiration: "1h",
            inactivity: "5m",
            remember_me_duration: "1M",
            redis: Redis {
                host: "redis",
                port: 6379,
                password: "${AUTHELIA_SESSION_REDIS_PASSWORD}",
            },
        },
        storage: Storage {
            encryption_key: "${AUTHELIA_STORAGE_ENCRYPTION_KEY}",
            local: PathOnly {
                path: "/config/db.sqlite3",
            },
        },
        notifier: Notifier {
            filesystem: FileNotifier {
                filename: "/config/notification.txt",
            },
        },
    };
    Ok(serde_yaml::to_string(&config)?)
}

#[derive(Serialize)]
struct Tunnel {
    tunnel: &'static str,
    #[serde(rename = "credentials-file")]
    credentials_file: &'static str,
    ingress: Vec<Ingress>,
}

#[derive(Serialize)]
struct Ingress {
    #[serde(skip_serializing_if = "Option::is_none")]
    hostname: Option<String>,
    service: String,
}

/// Public hostnames routed for each selected service id
const ROUTES: &[(&str, &[(&str, &str)])] = &[
    ("plex", &[("plex", "http://plex:32400")]),
    ("jellyfin", &[("jellyfin", "http://jellyfin:8096")]),
    (
        "arr",
        &[
            ("sonarr", "http://sonarr:8989"),
            ("radarr", "http://radarr:7878"),
            ("prowlarr", "http://prowlarr:9696"),
        ],
    ),
    ("torrent", &[("qbit", "http://gluetun:8080")]),
];

pub fn render_cloudflare(domain: &str, selected: &[String]) -> Result<String> {
    let route = |host: &str, service: &str| Ingress {
        hostname: Some(format!("{host}.{domain}")),
        service: service.to_string(),
    };

    let mut ingress = vec![
        route("auth", "http://authelia:9091"),
        route("hub", "http://homepage:3000"),
    ];
    for (service, hosts) in ROUTES {
        if selected.iter().any(|s| s == *service) {
            ingress.extend(hosts.iter().map(|&(host, target)| route(host, target)));
        }
    }
    ingress.push(Ingress {
        hostname: None,
        service: "http_status:404".to_string(),
    });

    let tunnel = Tunnel {
        tunnel: "YOUR_TUNNEL_ID",
        credentials_file: "/etc/cloudflared/cert.json",
        ingress,
    };
    Ok(serde_yaml::to_string(&tunnel)?)
}
