//! Zone settings pushed after a zone is added

use tracing::info;

use super::ZoneEngine;
use crate::error::Result;
use crate::model::{Toggle, ZoneSetting};

/// Settings applied to new zones, in the order they are sent
pub fn default_zone_settings() -> [ZoneSetting; 4] {
    [
        ZoneSetting::AutomaticHttpsRewrites(Toggle::On),
        ZoneSetting::AlwaysUseHttps(Toggle::On),
        ZoneSetting::Minify {
            css: Toggle::Off,
            html: Toggle::Off,
            js: Toggle::Off,
        },
        ZoneSetting::Brotli(Toggle::On),
    ]
}

impl ZoneEngine {
    /// Apply [`default_zone_settings`] to `zone_id`, stopping at the first failure
    pub async fn configure(&self, zone_id: &str) -> Result<()> {
        for setting in default_zone_settings() {
            self.provider.update_setting(zone_id, setting).await?;
            info!("Set {} = {} on zone {}", setting.id(), setting.value(), zone_id);
        }
        Ok(())
    }
}
