// headshot-forge - Professional headshot generation service backed by Gemini
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod gemini;
pub mod generation;
pub mod imaging;
pub mod metrics;
pub mod models;
pub mod prompt;
pub mod server;
pub mod storage;
pub mod utils;
