//! Once command implementation

use super::FeedOverrides;
use crate::config::Config;
use crate::display::render_panel;
use crate::feed::{refresh_once, CoinGeckoClient, FeedState};
use chrono::Utc;
use clap::Args;

#[derive(Args, Debug)]
pub struct OnceArgs {
    #[command(flatten)]
    pub overrides: FeedOverrides,
}

impl OnceArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        self.overrides.apply(&mut config);
        config.validate()?;

        let client = CoinGeckoClient::with_config(config.feed.coingecko())?;
        let strings = config.display.language.strings();

        let quotes = refresh_once(&client, &config.feed.assets)
            .await
            .map_err(|e| anyhow::anyhow!("{}: {}", strings.fetch_failed, e))?;

        let mut state = FeedState::new(&config.feed.assets);
        state.apply(&quotes, Utc::now());
        println!("{}", render_panel(&state, strings));

        Ok(())
    }
}
