//! Badge icon generation for a browser extension
//!
//! [`badge::render`] draws the icon for one size, [`icon_gen::generate_icons`]
//! writes the configured set as PNGs, and [`manifest::update_manifest`]
//! registers them in `manifest.json`. All three take their sizes and paths
//! from one [`config::IconConfig`].

pub mod badge;
pub mod config;
pub mod error;
pub mod font;
pub mod icon_gen;
pub mod manifest;

pub use config::IconConfig;
