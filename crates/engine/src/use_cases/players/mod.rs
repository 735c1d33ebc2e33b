//! Online player listing.

use std::sync::Arc;

use playerinfo_domain::OnlinePlayers;

use crate::infrastructure::ports::{PlayerRegistryPort, RegistryError};

pub struct ListOnline {
    registry: Arc<dyn PlayerRegistryPort>,
}

impl ListOnline {
    pub fn new(registry: Arc<dyn PlayerRegistryPort>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> Result<OnlinePlayers, RegistryError> {
        let players = self.registry.online_players().await?;
        Ok(OnlinePlayers::new(self.registry.max_players(), players))
    }
}
