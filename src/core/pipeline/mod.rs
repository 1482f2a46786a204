//! # Pipeline Module
//!
//! Orchestrates the full crawl -> hash -> report workflow and owns the
//! termination protocol between the crawler and the worker pool.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineReport};
