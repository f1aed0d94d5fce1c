//! gradewise-core: answer scoring, marking-scheme parsing, and progressive hints.
//!
//! This crate holds the deterministic, rule-based logic that grades free-text
//! answers against a marking scheme and produces progressive hints. It owns no
//! persistent state; the only shared resource is the [`normalize::Normalizer`],
//! loaded once through [`engine::Assessor::new`].

pub mod config;
pub mod engine;
pub mod error;
pub mod hints;
pub mod keypoints;
pub mod lemma;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod scheme;
pub mod scoring;
