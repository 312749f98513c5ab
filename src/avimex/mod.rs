pub mod client;
pub mod models;

pub use client::AvimexClient;
pub use models::ForwardReport;
