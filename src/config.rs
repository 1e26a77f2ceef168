use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

pub const DEFAULT_LEADERBOARD_URL: &str = "https://srpg7.groovestats.com/api/get-ranking.php?type=tplp&gender=all&superregion=all&country=all";
pub const DEFAULT_MESSAGE_TITLE: &str = "🛡️ SRPG VII scores (TP+LP) ⚔️";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
const DEFAULT_POLL_SECS: u64 = 3600;
const MIN_POLL_SECS: u64 = 60;

const APP_DIR: &str = "srpg_notifier";
const DB_FILE: &str = "snapshots.sqlite";

/// Change-label icons. Each one falls back to a built-in default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphs {
    pub up: String,
    pub down: String,
    pub new: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            up: "🔼".to_string(),
            down: "🔻".to_string(),
            new: "🆕".to_string(),
        }
    }
}

impl Glyphs {
    pub fn with_overrides(up: Option<String>, down: Option<String>, new: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            up: up.unwrap_or(defaults.up),
            down: down.unwrap_or(defaults.down),
            new: new.unwrap_or(defaults.new),
        }
    }
}

/// Name/region filters applied after world ranking.
///
/// Both sets hold lowercased entries; lookups lowercase the candidate first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankFilter {
    pub ignore_players: HashSet<String>,
    pub regions: HashSet<String>,
}

impl RankFilter {
    pub fn new<I, R, S, T>(ignore_players: I, regions: R) -> Self
    where
        I: IntoIterator<Item = S>,
        R: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            ignore_players: normalize_set(ignore_players),
            regions: normalize_set(regions),
        }
    }

    pub fn admits(&self, name: &str, region: &str) -> bool {
        !self.ignore_players.contains(&name.to_lowercase())
            && self.regions.contains(&region.to_lowercase())
    }
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub api_key: String,
    pub webhook_url: String,
    pub glyphs: Glyphs,
    pub message_title: String,
    pub filter: RankFilter,
    pub page_size: usize,
    pub leaderboard_url: String,
    pub db_path: Option<PathBuf>,
    pub bind: String,
    /// `None` disables the internal schedule.
    pub poll_secs: Option<u64>,
}

impl NotifierConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            api_key: String::new(),
            webhook_url: webhook_url.into(),
            glyphs: Glyphs::default(),
            message_title: DEFAULT_MESSAGE_TITLE.to_string(),
            filter: RankFilter::default(),
            page_size: DEFAULT_PAGE_SIZE,
            leaderboard_url: DEFAULT_LEADERBOARD_URL.to_string(),
            db_path: default_db_path(),
            bind: DEFAULT_BIND.to_string(),
            poll_secs: Some(DEFAULT_POLL_SECS),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |key: &str| non_empty(lookup(key));

        let webhook_url = value("NOTIFIER_WEBHOOK_URL")
            .ok_or_else(|| anyhow!("NOTIFIER_WEBHOOK_URL must be set"))?;

        let mut cfg = Self::new(webhook_url);
        cfg.api_key = value("NOTIFIER_API_KEY").unwrap_or_default();
        cfg.glyphs = Glyphs::with_overrides(
            value("NOTIFIER_EMOJI_UP"),
            value("NOTIFIER_EMOJI_DOWN"),
            value("NOTIFIER_EMOJI_NEW"),
        );
        if let Some(title) = value("NOTIFIER_MESSAGE_TITLE") {
            cfg.message_title = title;
        }
        cfg.filter = RankFilter::new(
            split_list(&value("NOTIFIER_IGNORE_PLAYERS").unwrap_or_default()),
            split_list(&value("NOTIFIER_REGIONS").unwrap_or_default()),
        );
        if let Some(raw) = value("NOTIFIER_PAGE_SIZE") {
            let size = raw
                .parse::<usize>()
                .with_context(|| format!("invalid NOTIFIER_PAGE_SIZE {raw:?}"))?;
            cfg.page_size = size.max(1);
        }
        if let Some(url) = value("NOTIFIER_LEADERBOARD_URL") {
            cfg.leaderboard_url = url;
        }
        if let Some(path) = value("NOTIFIER_DB_PATH") {
            cfg.db_path = Some(PathBuf::from(path));
        }
        if let Some(bind) = value("NOTIFIER_BIND") {
            cfg.bind = bind;
        }
        if let Some(raw) = value("NOTIFIER_POLL_SECS") {
            let secs = raw
                .parse::<u64>()
                .with_context(|| format!("invalid NOTIFIER_POLL_SECS {raw:?}"))?;
            cfg.poll_secs = (secs > 0).then(|| secs.max(MIN_POLL_SECS));
        }
        Ok(cfg)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn with_message_title(mut self, title: impl Into<String>) -> Self {
        self.message_title = title.into();
        self
    }

    pub fn with_filter(mut self, filter: RankFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR).join(DB_FILE));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR).join(DB_FILE))
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_set<I, S>(items: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{Glyphs, NotifierConfig, RankFilter, split_list};

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<NotifierConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NotifierConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const HOOK: (&str, &str) = ("NOTIFIER_WEBHOOK_URL", "https://example.com/hook");

    #[test]
    fn missing_webhook_is_an_error() {
        let err = config_from(&[("NOTIFIER_API_KEY", "k")]).unwrap_err();
        assert!(err.to_string().contains("NOTIFIER_WEBHOOK_URL"));
        assert!(config_from(&[("NOTIFIER_WEBHOOK_URL", "  ")]).is_err());
    }

    #[test]
    fn defaults_apply_when_only_webhook_is_set() {
        let cfg = config_from(&[HOOK]).expect("valid config");
        assert_eq!(cfg.webhook_url, "https://example.com/hook");
        assert_eq!(cfg.api_key, "");
        assert_eq!(cfg.page_size, 20);
        assert_eq!(cfg.poll_secs, Some(3600));
        assert_eq!(cfg.glyphs, Glyphs::default());
        assert!(cfg.filter.regions.is_empty());
    }

    #[test]
    fn poll_secs_zero_disables_and_small_values_are_floored() {
        let cfg = config_from(&[HOOK, ("NOTIFIER_POLL_SECS", "0")]).expect("valid config");
        assert_eq!(cfg.poll_secs, None);

        let cfg = config_from(&[HOOK, ("NOTIFIER_POLL_SECS", "5")]).expect("valid config");
        assert_eq!(cfg.poll_secs, Some(60));

        let cfg = config_from(&[HOOK, ("NOTIFIER_POLL_SECS", "900")]).expect("valid config");
        assert_eq!(cfg.poll_secs, Some(900));

        assert!(config_from(&[HOOK, ("NOTIFIER_POLL_SECS", "hourly")]).is_err());
    }

    #[test]
    fn page_size_must_parse_and_is_floored() {
        let cfg = config_from(&[HOOK, ("NOTIFIER_PAGE_SIZE", "0")]).expect("valid config");
        assert_eq!(cfg.page_size, 1);

        let cfg = config_from(&[HOOK, ("NOTIFIER_PAGE_SIZE", " 15 ")]).expect("valid config");
        assert_eq!(cfg.page_size, 15);

        let err = config_from(&[HOOK, ("NOTIFIER_PAGE_SIZE", "-3")]).unwrap_err();
        assert!(format!("{err:#}").contains("NOTIFIER_PAGE_SIZE"));
    }

    #[test]
    fn lists_and_overrides_are_read() {
        let cfg = config_from(&[
            HOOK,
            ("NOTIFIER_REGIONS", "FI, se"),
            ("NOTIFIER_IGNORE_PLAYERS", "RankBot,"),
            ("NOTIFIER_EMOJI_DOWN", ":down:"),
            ("NOTIFIER_MESSAGE_TITLE", "Weekly"),
        ])
        .expect("valid config");
        assert!(cfg.filter.admits("Alice", "se"));
        assert!(!cfg.filter.admits("rankbot", "fi"));
        assert_eq!(cfg.glyphs.down, ":down:");
        assert_eq!(cfg.glyphs.up, Glyphs::default().up);
        assert_eq!(cfg.message_title, "Weekly");
    }

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(split_list(" fi, se ,,"), vec!["fi", "se"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let filter = RankFilter::new(["SomeBot"], ["FI"]);
        assert!(filter.admits("Alice", "fi"));
        assert!(filter.admits("Alice", "Fi"));
        assert!(!filter.admits("somebot", "fi"));
        assert!(!filter.admits("Alice", "se"));
    }

    #[test]
    fn glyph_overrides_fall_back_per_field() {
        let glyphs = Glyphs::with_overrides(Some("⬆".to_string()), None, None);
        assert_eq!(glyphs.up, "⬆");
        assert_eq!(glyphs.down, Glyphs::default().down);
        assert_eq!(glyphs.new, Glyphs::default().new);
    }

    #[test]
    fn page_size_never_drops_to_zero() {
        let cfg = NotifierConfig::new("https://example.com/hook").with_page_size(0);
        assert_eq!(cfg.page_size, 1);
    }
}
