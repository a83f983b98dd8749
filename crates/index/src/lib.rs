mod dictionary;
mod inverted_index;

pub use dictionary::Dictionary;
pub use inverted_index::InvertedIndex;
