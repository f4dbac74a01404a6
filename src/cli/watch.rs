//! Watch command implementation

use super::FeedOverrides;
use crate::config::Config;
use crate::display::render_panel;
use crate::feed::{CoinGeckoClient, FeedState, PriceFeed};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

/// Clears the terminal and moves the cursor home
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub overrides: FeedOverrides,

    /// Seconds between refreshes
    #[arg(short, long)]
    pub interval_secs: Option<u64>,

    /// Append panels instead of redrawing the screen
    #[arg(long)]
    pub no_clear: bool,
}

impl WatchArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        self.overrides.apply(&mut config);
        if let Some(secs) = self.interval_secs {
            config.feed.refresh_interval_secs = secs;
        }
        config.validate()?;

        let client = CoinGeckoClient::with_config(config.feed.coingecko())?;
        let strings = config.display.language.strings();
        let clear = !self.no_clear;

        println!("{}", render_panel(&FeedState::new(&config.feed.assets), strings));

        let handle = PriceFeed::new(Arc::new(client))
            .assets(config.feed.assets.iter().cloned())
            .interval(Duration::from_secs(config.feed.refresh_interval_secs))
            .start(move |state| {
                if clear {
                    print!("{}", CLEAR_SCREEN);
                }
                println!("{}", render_panel(state, strings));
            });

        tokio::signal::ctrl_c().await?;
        tracing::info!("Interrupted, stopping feed");
        handle.stop();

        Ok(())
    }
}
