/// Side length of the square grid.
pub const BOARD_SIZE: i32 = 10;

pub const MIN_SHIP_LENGTH: usize = 2;
pub const MAX_SHIP_LENGTH: usize = 5;

/// Ship sizes drawn by a room, largest first, as `(length, count)`.
///
/// The first prompt of every room asks for a ship of `MAX_SHIP_LENGTH`
/// without consuming a count; every placement afterwards draws the next
/// size from this table.
pub const SHIP_SCHEDULE: [(usize, usize); 4] = [(5, 1), (4, 4), (3, 6), (2, 8)];

#[cfg(feature = "std")]
pub use server_config::ServerConfig;

#[cfg(feature = "std")]
mod server_config {
    use std::string::String;
    use tokio::time::Duration;

    /// Default bind address of the game server.
    pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

    /// Default timeout for a single frame read or write once started.
    pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default time a player may stay silent in the lobby before being dropped.
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

    /// Maximum accepted frame size (64 KiB); requests are tiny.
    pub const DEFAULT_MAX_FRAME_SIZE: u32 = 64 * 1024;

    /// Runtime settings of the game server.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        pub bind: String,
        pub io_timeout: Duration,
        /// Applies to the lobby only; a seated player may stay silent for
        /// as long as the match lasts.
        pub idle_timeout: Duration,
        pub max_frame_size: u32,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: DEFAULT_BIND.into(),
                io_timeout: DEFAULT_IO_TIMEOUT,
                idle_timeout: DEFAULT_IDLE_TIMEOUT,
                max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            }
        }
    }
}

#[cfg(feature = "std")]
pub use server_config::{
    DEFAULT_BIND, DEFAULT_IDLE_TIMEOUT, DEFAULT_IO_TIMEOUT, DEFAULT_MAX_FRAME_SIZE,
};
