//! Procedural triangle meshes built by advancing polygon cross-sections
//! ("boundaries") through space and stitching consecutive ones together.
//!
//! The pieces, from the bottom up:
//! - [`Transform`]: affine transforms on 4×4 homogeneous matrices, composed in
//!   the order their effects apply.
//! - [`IndexedMesh`]: a plain vertex/face accumulator.
//! - [`stitch`]: join two boundaries with a band of triangles, or cap one.
//! - [`Cage`], [`CageFork`], [`CageGen`]: a lazy, possibly infinite sequence of
//!   cross-sections that may end by splitting into several child sequences.
//! - [`traversal`]: pulls a [`CageGen`] and stitches everything into one mesh.
//! - [`branch`]: recursive branching where every path stops once its transform
//!   has shrunk below a threshold.
//!
//! ```
//! use cagegen::{Boundary, Cage, CageGen, ToMeshOptions, Transform};
//!
//! let sections = (0..3).map(|i| {
//!     let up = Transform::translation(0.0, 0.0, i as f64);
//!     Cage::single(Boundary::square(1.0).transform(&up))
//! });
//! let mesh = CageGen::new(sections)
//!     .to_mesh(&ToMeshOptions::default().close_first(true).close_last(true))
//!     .unwrap();
//! assert_eq!(mesh.face_count(), 24);
//! ```
//!
//! # Features
//! #### Default
//! - **hashmap**: enables use of hashbrown for edge analysis and `is_closed`
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export and import

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod boundary;
pub mod branch;
pub mod cage;
pub mod errors;
pub mod float_types;
pub mod fork;
pub mod gallery;
pub mod generator;
pub mod io;
pub mod mesh;
pub mod sequences;
pub mod stitch;
pub mod transform;
pub mod traversal;

pub use boundary::Boundary;
pub use branch::{BranchBuilder, BranchConfig, BranchNode, BranchRule, BranchStats};
pub use cage::{Cage, OverlapClass};
pub use errors::CageError;
pub use float_types::Real;
pub use fork::{CageFork, ForkLayout, transition_from};
pub use generator::{CageGen, CageStep};
pub use mesh::IndexedMesh;
pub use stitch::{JoinFn, close_boundary_simple, join_boundary_optim, join_boundary_simple};
pub use transform::Transform;
pub use traversal::{ToMeshOptions, to_mesh};

#[cfg(feature = "hashmap")]
pub use mesh::manifold::EdgeAnalysis;
