use serde_json::Value;

/// One unit of a job as listed by the units endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct JobRow {
    /// Unit identifier (the key of the units page object).
    pub key: String,
    /// Unit payload, passed through as returned by the API.
    pub row: Value,
}
