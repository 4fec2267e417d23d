pub mod config;
pub mod film;
pub mod scoring;
