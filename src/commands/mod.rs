pub mod crawl;
pub mod extract;
pub mod flatten;
pub mod search;
pub mod simhash;
pub mod webgraph;
