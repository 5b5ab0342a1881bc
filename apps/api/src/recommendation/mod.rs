// Career recommendation: record shape, response schema, prompts, fallback, and backends.
// All model calls go through llm_client.

pub mod fallback;
pub mod models;
pub mod prompts;
pub mod recommender;
pub mod schema;
