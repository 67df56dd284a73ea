/// Serialization layer: CSV export of processed runs.
pub mod export;
