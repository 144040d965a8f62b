pub mod cli;
pub mod compile;
pub mod config;
pub mod error;
pub mod extract;
pub mod ocr;
pub mod pipeline;
pub mod probe;
pub mod report;
pub mod request;
pub mod tools;
pub mod util;
pub mod workspace;
