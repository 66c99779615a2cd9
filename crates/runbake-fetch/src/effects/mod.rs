mod fetcher;
mod http;

pub use fetcher::{FetchOutcome, Fetcher};
pub use http::{BoxStream, HttpClient, HttpResponse};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
