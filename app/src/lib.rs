//! Terminal front end for the blog client.
//!
//! `main` parses a `Config`, installs logging, builds a `BlogApp` over
//! `ReqwestTransport`, and hands it to a `Shell` reading stdin.

pub mod config;
pub mod logging;
pub mod render;
pub mod shell;

pub use config::Config;
pub use shell::{Command, Shell};
