pub mod adapter;
pub mod config;

pub use adapter::ReqwestHttpClient;
pub use config::HttpConfig;
