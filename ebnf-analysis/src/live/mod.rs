//! Live sample matching
//!
//! `segments` turns a parse of sample text into matched and unmatched byte ranges. `registry`
//! keeps one versioned sample buffer per grammar. `engine` pushes segments to a
//! [`HighlightSink`]: matched ranges right away, unmatched ranges only after a debounce interval
//! and only if the sample has not changed in the meantime.

mod engine;
mod registry;
mod segments;

pub use engine::{HighlightSink, LiveMatchEngine, Phase};
pub use registry::{SampleBuffer, SampleRegistry, VersionStamp};
pub use segments::{compute_match, match_with, MatchReport, MatchSegment};
