use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

const REDACTED: &str = "[REDACTED]";

static BEARER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-_\.=]+").unwrap());

// `ak=` is the Baidu access key query parameter.
static QUERY_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([?&](?:ak|sk|key|api_key|token|access_token)=)[^&\s]+").unwrap()
});

static FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(["']?(?:api_key|apikey|token|secret|cookie|password)["']?\s*[:=]\s*["']?)[^"'\s,}&]+"#,
    )
    .unwrap()
});

/// Masks credentials in strings that end up in logs or terminal output
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretScrubber;

impl SecretScrubber {
    /// Scrub a message of sensitive data
    pub fn scrub_message(message: &str) -> String {
        let scrubbed = BEARER_PATTERN.replace_all(message, "Bearer [TOKEN_REDACTED]");
        let scrubbed = QUERY_KEY_PATTERN.replace_all(&scrubbed, |caps: &Captures| {
            format!("{}{REDACTED}", &caps[1])
        });
        FIELD_PATTERN
            .replace_all(&scrubbed, |caps: &Captures| format!("{}{REDACTED}", &caps[1]))
            .into_owned()
    }

    /// Whether an environment variable name looks like it holds a credential.
    pub fn is_secret_name(name: &str) -> bool {
        let upper = name.to_ascii_uppercase();
        upper == "AK"
            || upper.ends_with("_AK")
            || ["KEY", "TOKEN", "SECRET", "PASSWORD", "COOKIE"]
                .iter()
                .any(|marker| upper.contains(marker))
    }

    /// Copy of `env` with secret-looking values masked, in key order.
    pub fn scrub_env(env: &HashMap<String, String>) -> BTreeMap<String, String> {
        env.iter()
            .map(|(name, value)| {
                let shown = if Self::is_secret_name(name) {
                    REDACTED.to_string()
                } else {
                    Self::scrub_message(value)
                };
                (name.clone(), shown)
            })
            .collect()
    }
}
