pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod message;
pub mod ocr;
pub mod processing;
pub mod sink;
