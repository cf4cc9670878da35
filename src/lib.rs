pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod gui;
pub mod ini;
pub mod installer;
pub mod paths;
pub mod pe;
pub mod scan;
pub mod translator;
pub mod version;

pub use error::{InstallerError, Result};
