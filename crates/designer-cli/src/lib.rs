//! Library side of the domain designer CLI: logging setup and settings.

#![allow(missing_docs)]

pub mod logging;
pub mod settings;
