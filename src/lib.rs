// Wayfarer: content-based travel location recommendations.
//
// This is the library root. Each module corresponds to a part of the
// recommendation flow: storage, the like registry, the recommendation
// pipeline, and the outer surfaces (import, terminal output, web API).

pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod likes;
pub mod output;
pub mod recommend;
pub mod status;

#[cfg(feature = "web")]
pub mod web;
