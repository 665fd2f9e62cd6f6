//! # Query Lens
//!
//! A query analysis service that answers a natural-language question with
//! two independent signals: a two-class probability distribution from a
//! pretrained ONNX sequence classifier, and the set of corpus records whose
//! title or content contains the normalized query text.
//!
//! ## Architecture
//!
//! ```text
//!                   ┌────────────┐
//!            ┌─────▶│ Classifier │─────▶ class probabilities ─┐
//! raw text ──┤      └────────────┘                            ├─▶ result
//!            │      ┌────────────┐      ┌────────┐            │
//!            └─────▶│ Normalizer │─────▶│ Corpus │─▶ records ─┘
//!                   └────────────┘      └────────┘
//! ```
//!
//! Both signals are merged into a single [`models::AnalysisResult`] by the
//! [`pipeline::Analyzer`] and served via `POST /analyze`.
//!
//! ## Quick Start
//!
//! ```bash
//! qlens check                       # verify model + corpus load
//! qlens analyze "what is entropy"   # one-shot analysis
//! qlens serve                       # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Request/response data types |
//! | [`classifier`] | ONNX sequence classification |
//! | [`normalize`] | Conversational query normalization |
//! | [`corpus`] | In-memory record set and substring search |
//! | [`pipeline`] | Request orchestration and lazy initialization |
//! | [`server`] | HTTP server |

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod server;
