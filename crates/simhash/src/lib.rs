mod builder;
mod calculator;

pub use builder::{read_simhashes, write_simhashes, DocumentSimilarityInfo, FileSimhashBuilder};
pub use calculator::{calculate, tokenize};
