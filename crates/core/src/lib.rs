//! Core library for KlarText
//!
//! This crate implements the **Functional Core** of the KlarText text
//! simplification pipeline, following the Functional Core - Imperative Shell
//! architectural pattern.
//!
//! # Architecture Overview
//!
//! The workspace uses a split architecture to enforce separation of concerns:
//!
//! - **`klartext_core`** (this crate): Pure transformation functions with zero I/O
//! - **`klartext_pdf`**: PDF text extraction and cleanup
//! - **`klartext`**: I/O operations and orchestration (the Imperative Shell)
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Behavior is predictable and reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`text`]: Sentence splitting and word extraction heuristics
//! - [`metrics`]: Readability scoring (ARI, LIX) and the [`metrics::MetricRecord`] model
//! - [`similarity`]: TF-IDF cosine similarity for meaning preservation
//! - [`guardrails`]: Named pass/fail threshold checks on computed metrics
//! - [`tts`]: Text preprocessing for speech synthesis
//! - [`entry`]: The persisted log entry model
//! - [`stats`]: Aggregate statistics over logged runs
//! - [`report`]: Text and JSON report rendering
//!
//! Recoverable conditions (empty text, empty vocabulary, missing metric
//! values) degrade to defined zero/empty results rather than returning
//! errors; this crate deliberately exposes no fallible API.

pub mod entry;
pub mod guardrails;
pub mod metrics;
pub mod report;
pub mod similarity;
pub mod stats;
pub mod text;
pub mod tts;
