pub mod http;
pub mod traits;

pub use http::HttpGateway;
pub use traits::*;
