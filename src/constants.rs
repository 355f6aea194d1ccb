pub const DEFAULT_ENDPOINT: &str = "https://atlas.ripe.net";
pub const DEFAULT_REQUESTED_PROBES: u32 = 50;
pub const DEFAULT_PING_PACKETS: u32 = 3;
pub const DEFAULT_PING_SIZE: u32 = 48; // bytes
pub const DEFAULT_TRACEROUTE_TIMEOUT: u32 = 4000; // ms

/// Seconds between two polls of the results endpoint while streaming.
pub const DEFAULT_STREAM_POLL_INTERVAL: u64 = 5;
/// Seconds without a new result before the stream gives up.
pub const DEFAULT_STREAM_IDLE_TIMEOUT: u64 = 300;

pub const CONFIG_DIR_NAME: &str = "atlas-cli";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const SUPPORT_ADDRESS: &str = "atlas@ripe.net";

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
