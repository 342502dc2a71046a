#![allow(non_snake_case)]

pub mod configuration;
pub mod controller;
pub mod error;
pub mod handler;
pub mod provider;
pub mod server;
pub mod types;
pub mod watchlist;
