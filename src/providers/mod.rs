pub mod store_api;
pub mod upstream;
pub mod util;

pub use store_api::HttpStoreClient;
pub use upstream::HttpUpstreamClient;
