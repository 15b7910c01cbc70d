use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use promo_smith::{
    AllocatorConfig, DEFAULT_DURATION, DEFAULT_MAX_ATTEMPTS, DEFAULT_PARTNER, DEFAULT_PREFIX,
    DEFAULT_STORE_RETRIES, LIFETIME, NamingScheme, SUFFIX_SPACE, days_duration, is_duration,
};
use promo_smith_parse::{DEFAULT_API_ROOT, DEFAULT_CLASS_NAME, ParseConfig, ParseCredential};
use std::path::PathBuf;

/// Command line and environment settings for the `promo-smith` binary.
///
/// Every value can also come from the environment or a `.env` file in the
/// working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "promo-smith",
    version,
    about = "Issues one unique promo code per user and records it in Parse"
)]
pub struct CliArgs {
    /// Comma separated emails or phone numbers.
    ///
    /// Environment variable: `PROMO_USERS`
    #[arg(long, env = "PROMO_USERS", conflicts_with = "users_file")]
    pub users: Option<String>,

    /// File with one user per line. Only the first comma separated column is
    /// read, so CSV exports work as is.
    #[arg(long)]
    pub users_file: Option<PathBuf>,

    /// Code prefix, e.g. `AVZ-2DA-`.
    ///
    /// Environment variable: `PROMO_PREFIX`
    #[arg(long, env = "PROMO_PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Overrides `--prefix` when non-empty.
    #[arg(long)]
    pub custom_prefix: Option<String>,

    /// `LIFETIME` or a count with a unit letter: `30D`, `6M`, `1Y`.
    ///
    /// Environment variable: `PROMO_DURATION`
    #[arg(long, env = "PROMO_DURATION", default_value = DEFAULT_DURATION)]
    pub duration: String,

    /// Overrides `--duration` with `<n>D`. Must be a positive integer.
    #[arg(long)]
    pub custom_days: Option<String>,

    /// Distribution partner recorded with every code.
    ///
    /// Environment variable: `PROMO_PARTNER`
    #[arg(long, env = "PROMO_PARTNER", default_value = DEFAULT_PARTNER)]
    pub partner: String,

    /// Reason for issuing the codes, echoed in the report header. Required
    /// unless `--dry-run` is set.
    #[arg(long)]
    pub notes: Option<String>,

    /// Environment variable: `PARSE_API_ROOT`
    #[arg(long, env = "PARSE_API_ROOT", default_value = DEFAULT_API_ROOT)]
    pub parse_api_root: String,

    /// Environment variable: `PARSE_APP_ID`
    #[arg(long, env = "PARSE_APP_ID")]
    pub parse_app_id: Option<String>,

    /// Preferred over the REST key when both are set.
    ///
    /// Environment variable: `PARSE_MASTER_KEY`
    #[arg(long, env = "PARSE_MASTER_KEY", hide_env_values = true)]
    pub parse_master_key: Option<String>,

    /// Environment variable: `PARSE_REST_KEY`
    #[arg(long, env = "PARSE_REST_KEY", hide_env_values = true)]
    pub parse_rest_key: Option<String>,

    /// Parse class holding the issued codes.
    #[arg(long, default_value = DEFAULT_CLASS_NAME)]
    pub parse_class: String,

    /// Timeout for each request to Parse, in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Candidate codes tried per user before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Extra tries for an existence check that failed on the store side.
    #[arg(long, default_value_t = DEFAULT_STORE_RETRIES)]
    pub store_retries: usize,

    /// Allocate against an in-memory store instead of Parse.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Where the user list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSource {
    Inline(String),
    File(PathBuf),
}

/// Where codes are recorded.
#[derive(Debug, Clone)]
pub enum StoreTarget {
    Memory,
    Parse(ParseConfig),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub users: UserSource,
    pub scheme: NamingScheme,
    pub notes: Option<String>,
    pub store: StoreTarget,
    pub allocator: AllocatorConfig,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let users = match (args.users, args.users_file) {
            (Some(users), None) => UserSource::Inline(users),
            (None, Some(path)) => UserSource::File(path),
            (None, None) => bail!("no users given, pass --users or --users-file"),
            (Some(_), Some(_)) => bail!("--users and --users-file are mutually exclusive"),
        };

        if args.max_attempts == 0 {
            bail!("--max-attempts must be greater than 0");
        }
        if args.max_attempts as u64 > SUFFIX_SPACE {
            bail!(
                "--max-attempts ({}) exceeds the number of distinct suffixes ({})",
                args.max_attempts,
                SUFFIX_SPACE
            );
        }
        if args.timeout_secs == 0 {
            bail!("--timeout-secs must be greater than 0");
        }

        let prefix = match args.custom_prefix.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => custom.to_string(),
            _ => args.prefix,
        };
        if prefix.trim().is_empty() {
            bail!("the code prefix must not be empty");
        }

        let duration = match args.custom_days.as_deref() {
            Some(days) => days_duration(days)?,
            None => args.duration,
        };
        if !is_duration(&duration) {
            bail!("duration must be {LIFETIME} or a count such as 30D, 6M or 1Y, got {duration:?}");
        }

        let notes = args.notes.filter(|n| !n.trim().is_empty());
        let store = if args.dry_run {
            StoreTarget::Memory
        } else {
            let Some(app_id) = args.parse_app_id.filter(|id| !id.trim().is_empty()) else {
                bail!("PARSE_APP_ID is required unless --dry-run is set");
            };
            if notes.is_none() {
                bail!("--notes is required unless --dry-run is set, give the reason for the codes");
            }
            StoreTarget::Parse(
                ParseConfig::new(app_id)
                    .with_api_root(args.parse_api_root)
                    .with_class_name(args.parse_class)
                    .with_credential(ParseCredential::pick(
                        args.parse_master_key,
                        args.parse_rest_key,
                    ))
                    .with_timeout(Duration::from_secs(args.timeout_secs)),
            )
        };

        Ok(Self {
            users,
            scheme: NamingScheme::new(prefix, duration, args.partner),
            notes,
            store,
            allocator: AllocatorConfig::default()
                .with_max_attempts(args.max_attempts)
                .with_store_retries(args.store_retries),
        })
    }
}
