#![doc = include_str!("../README.md")]

pub mod angle;
pub mod aspect;
pub mod body;
pub mod composer;
pub mod config;
pub mod detectors;
pub mod driver;
pub mod ephemeris;
pub mod error;
pub mod event;
pub mod graph;
pub mod ical;
pub mod location;
pub mod pairer;
pub mod pairwise;
pub mod phase;
pub mod provider;
pub mod sink;
pub mod symbols;

pub use error::{CaelundasError, Result};
pub use event::{Event, EventPayload};
