// ABOUTME: Library crate for washbook exposing the booking wizard, session driver, and API client

#![allow(missing_docs)]

pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod session;
pub mod wizard;
