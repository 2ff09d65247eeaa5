// Copyright (C) 2025  Tom Waddington
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Command-line shell around the key-press scheduler

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use extended_afk::{KeyConfig, KeyPresser, RdevKeyboard, Settings};

/// Keep your session active by pressing keys at random intervals.
#[derive(Parser)]
#[command(name = "extended-afk", version)]
struct Cli {
    /// Comma-separated key names to press (at most 3), e.g. "l,t,f1"
    #[arg(long, value_delimiter = ',')]
    keys: Option<Vec<String>>,

    /// Minimum minutes between presses
    #[arg(long)]
    min: Option<u64>,

    /// Maximum minutes between presses
    #[arg(long)]
    max: Option<u64>,

    /// Press each key once instead of twice
    #[arg(long)]
    press_once: bool,

    /// Persist the effective settings for future runs
    #[arg(long)]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let path = Settings::default_path().context("could not determine config directory")?;
    let mut settings = Settings::load(&path);

    if let Some(keys) = cli.keys {
        settings.keys = keys
            .into_iter()
            .map(|key| KeyConfig::new(key, true))
            .collect();
    }
    if let Some(min) = cli.min {
        settings.min_interval_minutes = min;
    }
    if let Some(max) = cli.max {
        settings.max_interval_minutes = max;
    }
    if cli.press_once {
        for config in &mut settings.keys {
            config.press_twice = false;
        }
    }

    settings.validate().context("invalid configuration")?;
    let bounds = settings.bounds().context("invalid interval configuration")?;

    if cli.save {
        settings.save(&path)?;
    }

    let mut presser = KeyPresser::new(
        RdevKeyboard,
        settings.keys.clone(),
        bounds,
        Some(Box::new(|message: &str| println!("{message}"))),
    );

    presser.start();

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    println!();
    presser.stop().await;

    Ok(())
}
