//! Timeline-to-filter-graph compiler.
//!
//! `Shot`s become `Clip`s (motion path + blur ramps), adjacent clips are joined by scheduled
//! transitions, and the whole timeline is assembled into one acyclic [`graph::RenderGraph`].

pub(crate) mod graph;
pub(crate) mod schedule;
pub(crate) mod timeline;
