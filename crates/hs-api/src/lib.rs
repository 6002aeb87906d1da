//! Hindsight REST surface — library crate so the binary (`main.rs`) and the
//! e2e test crate can build routers against arbitrary runners and
//! directories.

pub mod config;
pub mod routes;
pub mod state;
