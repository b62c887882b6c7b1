pub mod console;
pub mod telegram;

use anyhow::bail;
use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::TransportBox;
use crate::domain::models::TransportName;

pub struct TransportManager {}

impl TransportManager {
    pub fn get(name: TransportName) -> Result<TransportBox> {
        if name == TransportName::Telegram {
            if Config::get(ConfigKey::TelegramToken).is_empty() {
                bail!("The telegram transport needs a bot token, set --telegram-token or SPYMASTER_TELEGRAM_TOKEN");
            }
            return Ok(Box::<telegram::Telegram>::default());
        }

        if name == TransportName::Console {
            return Ok(Box::<console::Console>::default());
        }

        bail!(format!("No transport implemented for {name}"))
    }
}
