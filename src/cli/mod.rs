// CLI module for headshot-forge
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;

/// headshot-forge - Professional headshot generation service backed by Gemini
#[derive(Parser, Debug)]
#[command(name = "headshot-forge", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.headshot-forge/config.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Probe the Gemini endpoint once and exit
    #[arg(long)]
    pub ping: bool,
}
