use thiserror::Error;

/// Errors raised while crawling a domain.
///
/// Per-URL failures are contained at the worker boundary (logged and dropped); only loader
/// and argument errors are expected to propagate past a worker loop.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised by the web-graph model.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("vertex {0} is out of range")]
    InvalidVertex(u32),
}

/// Errors raised while loading or serving the dictionary/inverted index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("corrupt dictionary line {line_no}: {text:?}")]
    CorruptDictionaryLine { line_no: usize, text: String },

    #[error("corrupt index line {line_no}: {text:?}")]
    CorruptIndexLine { line_no: usize, text: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the search engine itself (distinct from index-loading errors).
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Index(#[from] IndexError),
}
