#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod http;
pub mod memory;

pub use client::ExamApi;
pub use config::ApiConfig;
pub use error::ApiError;
pub use http::HttpExamApi;
pub use memory::{AnswerKey, InMemoryExamApi};
