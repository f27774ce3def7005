pub mod openweb_client;

pub use openweb_client::OpenWebClient;
