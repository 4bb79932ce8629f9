// Version history core: flatten snapshots into field maps, diff consecutive
// versions into commits, and rank the fields that change most.
// Everything here except `handlers` is pure and synchronous.

pub mod commits;
pub mod diff;
pub mod flatten;
pub mod handlers;
pub mod hotspots;
pub mod models;
pub mod normalize;
