//! Keyword search over regulation fragments, used to find external backing
//! for functions when no semantic search is available.

mod cache;
mod index;

pub use cache::NormativeIndexCache;
pub use index::{jaccard, tokenize, NormativeFragment, NormativeIndex, NormativeMatch};
