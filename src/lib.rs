pub mod backend;
pub mod completion;
pub mod config;
pub mod document;
pub mod logging;
pub mod parser;
