//! Index structures built on top of a [`stationpool_core::ProblemData`]:
//! OD demand tables (time-bucketed and aggregated), walking-limited
//! feasible candidate pairs, pooling detour groups, k-medoid clustering
//! and the corridor/anchor cross-zone tables derived from it.
//!
//! Everything here is read-only derived data — no decision variables or
//! constraints live in this crate; that is `stationpool-model`'s job.

pub mod aggregated;
pub mod anchor;
pub mod cluster;
pub mod corridor;
pub mod detour;
pub mod error;
pub mod feasible_pairs;
pub mod mapping;
pub mod od;
pub mod pooling;

pub use aggregated::AggregatedDemand;
pub use anchor::{Anchor, AnchorIndex};
pub use cluster::{ClusterMode, Clustering};
pub use corridor::{Corridor, CorridorIndex};
pub use detour::{DetourIndex, SameDestQuadruple, SameSourceTriple};
pub use error::{Error, Result};
pub use feasible_pairs::FeasiblePairTable;
pub use mapping::LabelMembers;
pub use od::OdPair;
pub use pooling::TimeBucketedDemand;
