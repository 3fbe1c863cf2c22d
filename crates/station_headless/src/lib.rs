//! # Station Headless
//!
//! Runs the station without a presentation layer:
//! - Scripted autoplay strategies
//! - Save inspection and reset for a save directory

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod runner;
pub mod strategies;
