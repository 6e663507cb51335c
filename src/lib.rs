// src/lib.rs
pub mod calendar;
pub mod resolve;
pub mod rules;
pub mod schedule;
