//! Startup reporting

mod logger;

pub use logger::StartupLogger;
