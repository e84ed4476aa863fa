//! Popularity fetch services

pub mod disambiguator;
pub mod fetch_loop;
pub mod fetch_tracker;
pub mod key_rotation;
pub mod review_client;
