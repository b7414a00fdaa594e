//! Command-line / environment configuration

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "learnhub", version, about = "LearnHub e-learning web app")]
pub struct Config {
    /// SQLite file holding courses, settings and backups
    #[arg(long, env = "LEARNHUB_DB", default_value = "learnhub.db")]
    pub db: PathBuf,

    #[arg(long, env = "LEARNHUB_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    #[arg(long, env = "LEARNHUB_STATIC", default_value = "crates/web/static")]
    pub static_dir: PathBuf,

    /// Lower bound of the support bot typing delay
    #[arg(long, env = "LEARNHUB_MIN_REPLY_DELAY_MS", default_value_t = 1000)]
    pub min_reply_delay_ms: u64,

    /// Upper bound of the support bot typing delay
    #[arg(long, env = "LEARNHUB_MAX_REPLY_DELAY_MS", default_value_t = 2000)]
    pub max_reply_delay_ms: u64,
}
