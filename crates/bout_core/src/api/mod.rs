pub mod json_api;

pub use json_api::{bout_stats_schema, reconstruct_json, ReconstructRequest};

pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const INVALID_SCHEMA_VERSION: &str = "INVALID_SCHEMA_VERSION";
    pub const INVALID_CONFIG: &str = "INVALID_CONFIG";
    pub const SERIALIZATION_FAILED: &str = "SERIALIZATION_FAILED";
}
