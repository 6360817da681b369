//! WBS Review - change request review for work breakdown structures
//!
//! Submitting, reviewing and auditing change requests against projects and
//! work packages. Accepted requests mutate budgets, timelines, leadership and
//! status, and timeline slips propagate through the dependency graph.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
