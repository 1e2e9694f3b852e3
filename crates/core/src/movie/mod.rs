//! The movie record flowing through both pipeline stages.
//!
//! Records are schemaless JSON objects; only the identifier, rating and
//! rank fields carry pipeline semantics. Everything else is passed through
//! untouched and merged blindly on enrichment.

mod types;

pub use types::{
    MovieRecord, DEFAULT_RANK, DEFAULT_RATING, ID_FIELD, LEGACY_ID_FIELD, RANK_FIELD, RATING_FIELD,
};
