mod crawler;
mod frontier;

pub use crawler::Crawler;
pub use frontier::{Frontier, FrontierItem};
