use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rank value read downstream when the selector never assigned one.
pub const DEFAULT_RANK: i64 = 0;

/// Rating used for ordering when the dataset field is missing or unparseable.
pub const DEFAULT_RATING: f64 = 0.0;

/// Primary identifier field.
pub const ID_FIELD: &str = "id";

/// Legacy identifier field still present in older dataset exports.
pub const LEGACY_ID_FIELD: &str = "imDbId";

/// Rating field as emitted by the dataset (stringified or numeric).
pub const RATING_FIELD: &str = "imDbRating";

/// Rank field assigned by the selector (1-based).
pub const RANK_FIELD: &str = "rank";

/// A single movie record.
///
/// Backed by a plain JSON object so that dataset and enrichment fields we
/// don't know about survive the round trip. Deserializing from anything
/// other than a JSON object fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieRecord {
    fields: Map<String, Value>,
}

impl MovieRecord {
    /// Wrap an existing JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build a record from a JSON value, returning `None` for non-objects.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Resolved identifier: `id`, falling back to the legacy `imDbId` key.
    ///
    /// Empty strings count as absent.
    pub fn id(&self) -> Option<&str> {
        self.str_field(ID_FIELD)
            .or_else(|| self.str_field(LEGACY_ID_FIELD))
    }

    /// Copy the legacy identifier under the canonical `id` key if needed.
    ///
    /// After this call, a record with any identifier at all exposes it as
    /// `id`; records with neither key are left untouched.
    pub fn normalize_id(&mut self) {
        if self.str_field(ID_FIELD).is_none() {
            if let Some(legacy) = self.str_field(LEGACY_ID_FIELD).map(str::to_string) {
                self.fields.insert(ID_FIELD.to_string(), Value::String(legacy));
            }
        }
    }

    /// Rating used for ranking.
    ///
    /// The dataset emits ratings both as JSON numbers and as strings;
    /// missing or unparseable values sort last via [`DEFAULT_RATING`].
    pub fn rating(&self) -> f64 {
        let parsed = match self.fields.get(RATING_FIELD) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        // Non-finite parses ("NaN", "inf") must not poison the sort order.
        parsed.filter(|r| r.is_finite()).unwrap_or(DEFAULT_RATING)
    }

    /// Rank assigned by the selector, or [`DEFAULT_RANK`] if absent.
    pub fn rank(&self) -> i64 {
        match self.fields.get(RANK_FIELD) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(DEFAULT_RANK),
            _ => DEFAULT_RANK,
        }
    }

    /// Assign the 1-based rank.
    pub fn set_rank(&mut self, rank: i64) {
        self.fields.insert(RANK_FIELD.to_string(), Value::from(rank));
    }

    /// Merge another object's fields into this record.
    ///
    /// Incoming fields win on collision, including `id` — after an
    /// enrichment merge the API's identifier is canonical.
    pub fn merge(&mut self, other: Map<String, Value>) {
        for (key, value) in other {
            self.fields.insert(key, value);
        }
    }

    /// Serialize to a JSON text representation.
    pub fn to_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }

    /// Borrow the underlying fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume the record, returning the underlying fields.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}
