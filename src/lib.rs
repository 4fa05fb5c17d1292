// src/lib.rs

//! datavisit: dataset discovery across FAIR Data Points and data access
//! request composition.

pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
