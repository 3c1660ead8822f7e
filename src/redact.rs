use serde::Serialize;
use serde_json::{Map, Value};

pub const REDACTED: &str = "[redacted]";

/// Case and separator insensitive, so `SONARR_API_KEY` matches `apikey`
pub fn is_sensitive_key(key: &str) -> bool {
    let key: String = key
        .chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect();
    key == "authorization"
        || ["password", "privatekey", "secret", "token", "apikey"]
            .iter()
            .any(|needle| key.contains(needle))
}

/// Replace the value of every sensitive key, at any depth
pub fn redact_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(redact_value).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| {
                    let value = if is_sensitive_key(&key) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_value(value)
                    };
                    (key, value)
                })
                .collect::<Map<_, _>>(),
        ),
        other => other,
    }
}

/// Serialize and redact in one step, for `debug!` lines
pub fn redacted<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .map(redact_value)
        .map(|v| v.to_string())
        .unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_nested_sensitive_keys() {
        let input = json!({
            "domain": "media.lan",
            "password": "hunter2",
            "serviceConfigs": {"arr": {"SONARR_API_KEY": "abc", "url": "http://sonarr"}},
            "profiles": [{"cloudflareToken": "t"}],
            "Authorization": "Bearer x",
            "wireguardPrivateKey": {"nested": "still hidden"}
        });
        let out = redact_value(input);
        assert_eq!(out["domain"], "media.lan");
        assert_eq!(out["password"], REDACTED);
        assert_eq!(out["serviceConfigs"]["arr"]["SONARR_API_KEY"], REDACTED);
        assert_eq!(out["serviceConfigs"]["arr"]["url"], "http://sonarr");
        assert_eq!(out["profiles"][0]["cloudflareToken"], REDACTED);
        assert_eq!(out["Authorization"], REDACTED);
        assert_eq!(out["wireguardPrivateKey"], REDACTED);
    }

    #[test]
    fn key_matching_is_case_insensitive() {
        assert!(is_sensitive_key("PlexToken"));
        assert!(is_sensitive_key("client_SECRET"));
        assert!(is_sensitive_key("openaiApiKey"));
        assert!(!is_sensitive_key("auth"));
        assert!(is_sensitive_key("SONARR_API_KEY"));
        assert!(is_sensitive_key("radarr-api-key"));
        assert!(is_sensitive_key("PRIVATE_KEY"));
        assert!(!is_sensitive_key("keyboard_layout"));
    }
}
