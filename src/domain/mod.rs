//! Core domain types and logic.

pub mod bar;
pub mod indicator;
pub mod provider;
pub mod predicate;
pub mod predicate_parser;
pub mod predicate_eval;
pub mod overlay;
pub mod signal;
pub mod strategy;
pub mod error;
