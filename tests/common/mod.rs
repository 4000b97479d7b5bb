//! Shared helpers for tests that need a real map-matching backend.

#![allow(dead_code)]

pub mod osrm;
