pub mod download;
pub mod http_client;
#[cfg(test)]
pub(crate) mod test_server;

pub use download::*;
pub use http_client::*;
