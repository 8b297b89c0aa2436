//! UI layer: the single minter screen and its view model.

pub mod app;
pub mod view_model;

pub use app::MinterApp;
