//! Groundwater analysis on top of the parsed tables in `gwd-core`.
//!
//! This crate turns well records, region boundaries, projected points, and
//! component tables into the summaries the map and chart views display:
//! regional decade drop-off, selection statistics, and component rankings,
//! plus the yearly, depth-change, and per-well derivations feeding them.

pub mod classify;
pub mod depth_change;
pub mod dropoff;
pub mod history;
pub mod projection;
pub mod ranking;
pub mod selection;
pub mod yearly;
