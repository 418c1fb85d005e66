//! Errors raised while building cage sequences and meshes

/// Everything that can stop a mesh build.
///
/// Variants fall in three groups:
/// - precondition violations (how the engine was called),
/// - numerical degeneracies (what the geometry looks like), see [`CageError::is_degeneracy`],
/// - configuration errors, currently only [`CageError::UnboundedSequence`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CageError {
    /// (EmptyBoundary) A boundary with no points was used
    #[error("(EmptyBoundary) boundary has no points")]
    EmptyBoundary,

    /// (TooFewPoints) A boundary has fewer points than the operation needs
    #[error("(TooFewPoints) operation needs at least {needed} points, boundary has {found}")]
    TooFewPoints { needed: usize, found: usize },

    /// (BoundaryLengthMismatch) Two stitched boundaries disagree on vertex count
    #[error("(BoundaryLengthMismatch) cannot join boundaries of {left} and {right} points")]
    BoundaryLengthMismatch { left: usize, right: usize },

    /// (CageCountMismatch) Two consecutive cages carry a different number of boundaries
    #[error("(CageCountMismatch) step {step} has {found} boundaries, previous cage had {expected}")]
    CageCountMismatch {
        step: usize,
        expected: usize,
        found: usize,
    },

    /// (EmptySequence) A sequence produced no elements at all
    #[error("(EmptySequence) cage sequence produced no elements")]
    EmptySequence,

    /// (ForkAtStart) A sequence opened with a fork instead of a cage
    #[error("(ForkAtStart) first element of a cage sequence can't be a fork")]
    ForkAtStart,

    /// (ForkFromMultipleBoundaries) A fork followed a cage with more than one boundary
    #[error("(ForkFromMultipleBoundaries) a fork needs a single parent boundary, found {found}")]
    ForkFromMultipleBoundaries { found: usize },

    /// (InvalidAdjacency) A fork's adjacency data does not fit its parent or transition set
    #[error("(InvalidAdjacency) {0}")]
    InvalidAdjacency(String),

    /// (TransitionCoverage) Adjacency lists don't cover the transition vertices exactly once
    #[error("(TransitionCoverage) {0}")]
    TransitionCoverage(String),

    /// (FaceIndexOutOfRange) A face refers to a vertex that does not exist
    #[error("(FaceIndexOutOfRange) face {face} uses index {index} but mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    /// (ConflictingOptions) Traversal options that can't be combined
    #[error("(ConflictingOptions) {0}")]
    ConflictingOptions(&'static str),

    /// (InvalidParameter) A numeric parameter is outside the range the operation accepts
    #[error("(InvalidParameter) {0}")]
    InvalidParameter(&'static str),

    /// (UnboundedSequence) An infinite sequence was traversed without a step limit
    #[error("(UnboundedSequence) sequence is not known to be finite and no step count was given")]
    UnboundedSequence,

    /// (DegenerateEdge) An edge is too short to take part in alignment search
    #[error("(DegenerateEdge) edge {edge} has length {length:e}")]
    DegenerateEdge { edge: usize, length: f64 },

    /// (DegenerateBoundary) A boundary spans no area (collinear or coincident points)
    #[error("(DegenerateBoundary) boundary does not span a plane")]
    DegenerateBoundary,

    /// (NonConvexBoundary) Centroid lies outside the boundary, so a fan cap would fold over
    #[error("(NonConvexBoundary) centroid lies outside edge {edge}")]
    NonConvexBoundary { edge: usize },

    /// (DegenerateAxis) A zero-length axis was given where a direction is required
    #[error("(DegenerateAxis) axis has zero length")]
    DegenerateAxis,
}

impl CageError {
    /// True for errors describing bad geometry or parameters rather than bad usage.
    pub const fn is_degeneracy(&self) -> bool {
        matches!(
            self,
            CageError::DegenerateEdge { .. }
                | CageError::DegenerateBoundary
                | CageError::NonConvexBoundary { .. }
                | CageError::DegenerateAxis
        )
    }
}
