pub mod app;
pub mod config;
pub mod effects;
pub mod logging;
#[cfg(test)]
pub(crate) mod test_support;
pub mod ui;

pub use app::run_app;
