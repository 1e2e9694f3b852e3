use std::sync::Arc;

use marquee_core::{Config, Enricher, QueueConsumer, SanitizedConfig, Selector};

/// Shared application state
pub struct AppState {
    config: Config,
    selector: Selector,
    enricher: Enricher,
    queue: Arc<dyn QueueConsumer>,
}

impl AppState {
    pub fn new(
        config: Config,
        selector: Selector,
        enricher: Enricher,
        queue: Arc<dyn QueueConsumer>,
    ) -> Self {
        Self {
            config,
            selector,
            enricher,
            queue,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn enricher(&self) -> &Enricher {
        &self.enricher
    }

    pub fn queue(&self) -> &dyn QueueConsumer {
        self.queue.as_ref()
    }
}
