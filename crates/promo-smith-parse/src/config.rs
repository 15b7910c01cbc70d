use core::time::Duration;

/// Parse server used when none is configured.
pub const DEFAULT_API_ROOT: &str = "https://parseapi.back4app.com/";

/// Class holding one object per issued promo code.
pub const DEFAULT_CLASS_NAME: &str = "PromoCodeInfo";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The key sent alongside the application id.
///
/// The master key bypasses class-level permissions and is preferred when both
/// are available.
#[derive(Clone, PartialEq, Eq)]
pub enum ParseCredential {
    /// Sent as `X-Parse-Master-Key`.
    MasterKey(String),
    /// Sent as `X-Parse-REST-API-Key`.
    RestApiKey(String),
}

impl ParseCredential {
    /// Picks the master key if set, else the REST key. Empty values count as
    /// unset.
    pub fn pick(master_key: Option<String>, rest_api_key: Option<String>) -> Option<Self> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        non_empty(master_key)
            .map(Self::MasterKey)
            .or_else(|| non_empty(rest_api_key).map(Self::RestApiKey))
    }

    pub const fn header_name(&self) -> &'static str {
        match self {
            Self::MasterKey(_) => "X-Parse-Master-Key",
            Self::RestApiKey(_) => "X-Parse-REST-API-Key",
        }
    }

    pub fn secret(&self) -> &str {
        match self {
            Self::MasterKey(s) | Self::RestApiKey(s) => s,
        }
    }
}

// Keeps secrets out of logs.
impl core::fmt::Debug for ParseCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MasterKey(_) => f.write_str("MasterKey(***)"),
            Self::RestApiKey(_) => f.write_str("RestApiKey(***)"),
        }
    }
}

/// Connection settings for a [`ParseStore`](crate::ParseStore).
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Base address of the Parse REST API, e.g. `https://parseapi.back4app.com/`.
    pub api_root: String,
    /// Sent as `X-Parse-Application-Id`.
    pub app_id: String,
    /// Optional access key; without one only the application id is sent.
    pub credential: Option<ParseCredential>,
    pub class_name: String,
    /// Applies to each request separately.
    pub timeout: Duration,
}

impl ParseConfig {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            app_id: app_id.into(),
            credential: None,
            class_name: DEFAULT_CLASS_NAME.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    #[must_use]
    pub fn with_credential(mut self, credential: Option<ParseCredential>) -> Self {
        self.credential = credential;
        self
    }

    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{api_root}/classes/{class_name}`, tolerating a trailing slash on the
    /// root.
    pub fn collection_url(&self) -> String {
        format!(
            "{}/classes/{}",
            self.api_root.trim_end_matches('/'),
            self.class_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_key_wins_over_rest_key() {
        let picked = ParseCredential::pick(Some("m".into()), Some("r".into()));
        assert_eq!(picked, Some(ParseCredential::MasterKey("m".into())));
        assert_eq!(picked.unwrap().header_name(), "X-Parse-Master-Key");
    }

    #[test]
    fn empty_master_key_falls_back_to_rest_key() {
        let picked = ParseCredential::pick(Some("  ".into()), Some("r".into()));
        assert_eq!(picked, Some(ParseCredential::RestApiKey("r".into())));
        assert_eq!(ParseCredential::pick(None, Some(String::new())), None);
    }

    #[test]
    fn debug_hides_secrets() {
        let cred = ParseCredential::MasterKey("hunter2".into());
        assert_eq!(format!("{cred:?}"), "MasterKey(***)");
    }

    #[test]
    fn collection_url_joins_root_and_class() {
        let config = ParseConfig::new("app");
        assert_eq!(
            config.collection_url(),
            "https://parseapi.back4app.com/classes/PromoCodeInfo"
        );

        let config = ParseConfig::new("app")
            .with_api_root("http://localhost:1337/parse")
            .with_class_name("Codes");
        assert_eq!(
            config.collection_url(),
            "http://localhost:1337/parse/classes/Codes"
        );
    }
}
