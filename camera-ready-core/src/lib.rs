#![doc = "camera-ready-core: core logic library for camera-ready proceedings."]

//! This crate contains the data models and pipelines used to turn a conference's
//! accepted submissions into a proceedings volume: identifier assignment, page
//! accounting, BibTeX rendering, PDF renaming, schedule cross-referencing and
//! downloading camera-ready PDFs from the review platform.
//!
//! The review platform and the PDF page counter are reached only through the
//! traits in [`contract`], so the CLI crate supplies the concrete HTTP client
//! and tests supply mocks.
//!
//! # Usage
//! Add this as a dependency for all shared pipeline, config and reporting code.

pub mod bibtex;
pub mod compile;
pub mod config;
pub mod contract;
pub mod crossref;
pub mod download;
pub mod error;
pub mod grouping;
pub mod identifier;
pub mod latex;
pub mod metadata;
pub mod pages;
pub mod schedule;
pub mod submission;
