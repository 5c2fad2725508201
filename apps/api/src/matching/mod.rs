// Resume ↔ JD matching: normalization, the three sub-scorers, aggregation,
// keyword reconciliation and advice. External services sit behind the
// `Embedder`, `KeywordService` and `AdviceService` traits.

pub mod advice;
pub mod aggregate;
pub mod embedding;
pub mod format;
pub mod handlers;
pub mod keywords;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod similarity;

#[cfg(test)]
pub mod testing;
