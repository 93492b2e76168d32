pub mod api;
pub mod config;
pub mod download;
pub mod encode;
pub mod error;
pub mod generator;
pub mod init;
pub mod job;
pub mod normalize;
pub mod poller;
pub mod resolution;

pub use error::{Error, Result};

pub(crate) fn logi(message: impl AsRef<str>) {
    tracing::info!(tag = "INFO", "{}", message.as_ref());
}

pub(crate) fn logok(message: impl AsRef<str>) {
    tracing::info!(tag = "OK", "{}", message.as_ref());
}

pub(crate) fn logw(message: impl AsRef<str>) {
    tracing::warn!(tag = "WARN", "{}", message.as_ref());
}
