pub mod chunk_store;
pub mod oracle;

pub use oracle::{OpenAiOracle, Oracle, WebSearch};
