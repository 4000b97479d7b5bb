//! Test fixtures for route-geometry.
//!
//! Provides realistic test data:
//! - Los Mochis stops and a hand-drawn route through them
//! - A short Monaco trace that matches against OSRM's Monaco extract

#![allow(dead_code)]

pub mod los_mochis;

pub use los_mochis::*;
