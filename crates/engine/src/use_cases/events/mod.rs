//! Cache invalidation on player state transitions.
//!
//! A join or quit changes name, online status, location and AFK state at
//! once, so any cached profile for the player is dropped. The registry
//! calls the bridge in-line through [`PlayerEventListener`]; `run` serves
//! hosts that deliver events over a channel instead.

use std::sync::Arc;

use playerinfo_domain::PlayerEvent;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::ports::PlayerEventListener;
use crate::stores::PlayerDataCache;

pub struct PlayerEventBridge {
    cache: Arc<PlayerDataCache>,
    debug: bool,
}

impl PlayerEventBridge {
    pub fn new(cache: Arc<PlayerDataCache>, debug: bool) -> Self {
        Self { cache, debug }
    }

    pub fn on_join(&self, name: &str) {
        self.invalidate("join", name);
    }

    pub fn on_quit(&self, name: &str) {
        self.invalidate("quit", name);
    }

    pub fn handle(&self, event: &PlayerEvent) {
        self.invalidate(event.kind(), event.name());
    }

    /// Consume events until the channel closes or `cancel` fires.
    ///
    /// Returns the number of events handled.
    pub async fn run(
        &self,
        mut events: mpsc::UnboundedReceiver<PlayerEvent>,
        cancel: CancellationToken,
    ) -> usize {
        tracing::info!("Starting player event bridge");
        let mut handled = 0;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(handled, "Player event bridge shutting down");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle(&event);
                        handled += 1;
                    }
                    None => {
                        tracing::info!(handled, "Player event channel closed");
                        break;
                    }
                },
            }
        }
        handled
    }

    fn invalidate(&self, kind: &str, name: &str) {
        let removed = self.cache.invalidate(name);
        if self.debug {
            tracing::info!(event = kind, player = %name, removed, "Invalidated cached profile");
        }
    }
}

impl PlayerEventListener for PlayerEventBridge {
    fn on_player_event(&self, event: &PlayerEvent) {
        self.handle(event);
    }
}
