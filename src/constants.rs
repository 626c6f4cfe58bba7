pub const BASE_URL: &str = "https://api.depined.org/api";

// ENDPOINTS
pub const PROFILE_PATH: &str = "/user/overview/profile";
pub const HEARTBEAT_PATH: &str = "/user/widget-connect";
pub const EARNINGS_PATH: &str = "/stats/earnings";

// HEADERS
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const SITE_URL: &str = "https://depined.org/";

// FILES
pub const CONFIG_FILE_PATH: &str = "data/config.toml";
pub const TOKENS_FILE_PATH: &str = "data/tokens.txt";
pub const PROXIES_FILE_PATH: &str = "data/proxies.txt";
pub const LOGS_DIR: &str = "logs";

// DELAYS (ms)
pub const ACCOUNT_DELAY: u64 = 1_000;
pub const CYCLE_DELAY: u64 = 30_000;
pub const REQUEST_TIMEOUT: u64 = 60_000;

// Timestamps are rendered in UTC+8 civil time
pub const DISPLAY_UTC_OFFSET_SECS: i32 = 8 * 3600;
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

pub const PLACEHOLDER: &str = "-";
