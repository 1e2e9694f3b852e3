pub mod config;
pub mod dataset;
pub mod enricher;
pub mod metadata;
pub mod metrics;
pub mod movie;
pub mod queue;
pub mod selector;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatasetConfig,
    MetadataConfig, QueueConfig, SanitizedConfig, SelectorConfig, ServerConfig, StoreConfig,
};
pub use dataset::{DatasetError, DatasetSource, HttpDatasetSource};
pub use enricher::{BatchReport, Enricher, EnricherConfig, CONTENT_TYPE_JSON};
pub use metadata::{MetadataApi, MetadataError, OmdbClient};
pub use movie::MovieRecord;
pub use queue::{FsQueue, MessageBody, QueueConsumer, QueueError, QueuePublisher, RawMessage};
pub use selector::{Selector, SelectorError, SelectorReport};
pub use store::{BlobStore, FsBlobStore, StoreError};
