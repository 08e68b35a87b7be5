use std::time::Duration;

use common::log;
use tokio::time::MissedTickBehavior;

use crate::game_registry::GameRegistry;

/// Drives the registry on a fixed period for the life of the process.
pub struct TickTask {
    registry: GameRegistry,
    tick_interval: Duration,
}

impl TickTask {
    pub fn new(registry: GameRegistry) -> Self {
        let tick_interval = registry.tick_interval();
        Self {
            registry,
            tick_interval,
        }
    }

    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            self.tick_once().await;
        }
    }

    async fn tick_once(&self) {
        let report = self.registry.tick().await;
        if !report.is_quiet() {
            log!(
                "Tick: {} stepped, {} ended, {} expired, {} failed",
                report.stepped,
                report.ended.len(),
                report.expired.len(),
                report.failed.len()
            );
        }
    }
}
