pub mod api_server;
pub mod browser;
pub mod request_logger;
