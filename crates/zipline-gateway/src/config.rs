use clap::Parser;

/// Configuration for the Zipline gateway, from flags or environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "zipline", about = "Two-tier URL shortener gateway")]
pub struct Config {
    /// Address the HTTP server binds to.
    #[arg(long, env = "ZIPLINE_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// MySQL connection string for the durable store.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Redis connection string for the volatile cache.
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Base URL rendered into short links, e.g. "https://zip.li".
    #[arg(long, env = "ZIPLINE_PUBLIC_URL", default_value = "http://127.0.0.1:8080")]
    pub public_base_url: String,

    /// LINE messaging channel access token. The bot webhook is only
    /// mounted when this and the channel secret are both set.
    #[arg(long, env = "CHANNELTOKEN")]
    pub line_channel_token: Option<String>,

    /// LINE messaging channel secret, used to verify the signature on
    /// inbound webhook deliveries.
    #[arg(long, env = "CHANNELSECRET")]
    pub line_channel_secret: Option<String>,
}
