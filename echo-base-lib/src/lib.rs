#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for echo-base
//!
//! This library turns loosely-typed Star Wars API records and local seed
//! documents into the two data files the Rebel Alliance asked for.
//!
//! # Module Organization
//!
//! - [`records`]: Key filtering, merging, sentinel resolution, type coercion and normalization
//! - [`fetch`]: Retrieval of remote records
//! - [`documents`]: Reading and writing JSON documents, typed access to the Echo Base document
//! - `commands`: Command-line interface and the assembly sequence

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

mod commands;
pub mod documents;
pub mod fetch;
pub mod records;

pub use crate::commands::{Host, run};
