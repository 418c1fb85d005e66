//! Recursive branching by repeated transforms, stopped by scale decay.
//!
//! A branch grows ring by ring: every node carries the transform that places
//! the base polygon at that point, plus the vertex indices of the ring it grows
//! from. A [`BranchRule`] decides what a node turns into (usually one more ring
//! and one or more child nodes). Growth stops on any path once the node's
//! transform has shrunk below [`BranchConfig::scale_min`], at which point the
//! open ring is capped.
//!
//! Because each step multiplies the scale by a factor below one, every path is
//! finite: with a per-step factor `s` the depth never exceeds
//! `ceil(ln(scale_min) / ln(s))`.

use crate::boundary::Boundary;
use crate::errors::CageError;
use crate::float_types::{FRAC_PI_2, Real};
use crate::mesh::IndexedMesh;
use crate::transform::Transform;
use nalgebra::Vector3;

/// Limits shared by every rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchConfig {
    /// Nodes whose largest axis scale is below this are capped, not expanded.
    pub scale_min: Real,
    /// Optional hard depth limit on top of the scale test.
    pub max_depth: Option<usize>,
}

impl Default for BranchConfig {
    fn default() -> Self {
        BranchConfig {
            scale_min: 0.02,
            max_depth: None,
        }
    }
}

/// One open end of the growing structure.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchNode<K> {
    /// Places the base polygon at this node
    pub transform: Transform,
    /// Vertex indices of the ring this node grows from, in base order
    pub ring: Vec<usize>,
    pub depth: usize,
    /// Rule-defined tag, e.g. trunk or side shoot
    pub kind: K,
}

/// Counters collected while growing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BranchStats {
    pub nodes_expanded: usize,
    pub rings: usize,
    pub caps: usize,
    pub max_depth_reached: usize,
    /// Smallest scale at which a node was expanded, `None` if none was
    pub min_expanded_scale: Option<Real>,
}

/// Shape-specific part of a branching structure.
pub trait BranchRule {
    type Kind: Copy + std::fmt::Debug;

    /// Grows `node` by one step and returns the nodes to continue from.
    ///
    /// Called only for nodes that passed the termination test. Returning no
    /// children leaves `node.ring` open; rules normally hand every ring they
    /// open to some child so the builder can cap it. Rules that only work on a
    /// particular base polygon reject any other here.
    fn expand(
        &self,
        builder: &mut BranchBuilder,
        node: &BranchNode<Self::Kind>,
    ) -> Result<Vec<BranchNode<Self::Kind>>, CageError>;
}

/// Owns the mesh being built and walks a [`BranchRule`] depth-first.
#[derive(Debug, Clone)]
pub struct BranchBuilder {
    mesh: IndexedMesh,
    base: Boundary,
    config: BranchConfig,
    stats: BranchStats,
}

impl BranchBuilder {
    /// Fails if `base` cannot be capped or if nothing would ever stop the
    /// recursion (non-positive `scale_min` without a `max_depth`).
    pub fn new(base: Boundary, config: BranchConfig) -> Result<Self, CageError> {
        if base.len() < 3 {
            return Err(CageError::TooFewPoints {
                needed: 3,
                found: base.len(),
            });
        }
        let bounded = config.scale_min > 0.0 && config.scale_min.is_finite();
        if !bounded && config.max_depth.is_none() {
            return Err(CageError::InvalidParameter(
                "scale_min must be positive unless max_depth is set",
            ));
        }
        Ok(BranchBuilder {
            mesh: IndexedMesh::new(),
            base,
            config,
            stats: BranchStats::default(),
        })
    }

    pub fn base(&self) -> &Boundary {
        &self.base
    }

    pub fn config(&self) -> &BranchConfig {
        &self.config
    }

    pub fn mesh(&self) -> &IndexedMesh {
        &self.mesh
    }

    /// Pushes the base polygon placed by `xf` and returns its indices.
    pub fn push_ring(&mut self, xf: &Transform) -> Vec<usize> {
        let start = self.mesh.push_vertices(xf.apply_to(self.base.points()));
        self.stats.rings += 1;
        (start..start + self.base.len()).collect()
    }

    /// Pushes a new ring placed by `xf` and connects `from` to it with one
    /// quad `[a_i, a_{i+1}, b_{i+1}, b_i]` per edge (`a` new, `b` old).
    pub fn extend_ring(
        &mut self,
        from: &[usize],
        xf: &Transform,
    ) -> Result<Vec<usize>, CageError> {
        self.check_ring(from)?;
        let ring = self.push_ring(xf);
        let n = ring.len();
        for i in 0..n {
            let j = (i + 1) % n;
            self.mesh.push_quad(ring[i], ring[j], from[j], from[i]);
        }
        Ok(ring)
    }

    /// Pushes the base polygon placed by `xf` with a midpoint inserted on every
    /// edge, plus its centroid, and bridges `from` onto it.
    ///
    /// Returns the `2n` indices of the subdivided ring (corners on even
    /// positions, the midpoint of edge `(i, i+1)` on `2i + 1`) and the index of
    /// the centroid. Each side `(b_i, b_j)` of `from` is joined to the corner,
    /// midpoint, corner run above it by a fan of three triangles, so the open
    /// edges left behind are exactly those of the subdivided ring.
    pub fn split_ring(
        &mut self,
        from: &[usize],
        xf: &Transform,
    ) -> Result<(Vec<usize>, usize), CageError> {
        self.check_ring(from)?;
        let sub = self.base.subdivide();
        let centre = xf.apply_point(&self.base.centroid());
        let start = self
            .mesh
            .push_vertices(xf.apply_to(sub.points()).into_iter().chain([centre]));
        self.stats.rings += 1;

        let m = sub.len();
        let ring: Vec<usize> = (start..start + m).collect();
        let n = from.len();
        for i in 0..n {
            let j = (i + 1) % n;
            self.mesh.push_polygon(&[
                from[i],
                ring[2 * i],
                ring[2 * i + 1],
                ring[(2 * i + 2) % m],
                from[j],
            ]);
        }
        Ok((ring, start + m))
    }

    fn check_ring(&self, ring: &[usize]) -> Result<(), CageError> {
        if ring.len() != self.base.len() {
            return Err(CageError::BoundaryLengthMismatch {
                left: ring.len(),
                right: self.base.len(),
            });
        }
        Ok(())
    }

    /// Closes `ring` with a single polygon of opposite winding.
    pub fn cap(&mut self, ring: &[usize]) {
        let reversed: Vec<usize> = ring.iter().rev().copied().collect();
        self.mesh.push_polygon(&reversed);
        self.stats.caps += 1;
    }

    fn should_stop(&self, xf: &Transform, depth: usize) -> bool {
        xf.max_scale() < self.config.scale_min
            || self.config.max_depth.is_some_and(|max| depth >= max)
    }

    /// Terminates or expands `node`, then recurses into its children.
    pub fn grow<R: BranchRule + ?Sized>(
        &mut self,
        rule: &R,
        node: BranchNode<R::Kind>,
    ) -> Result<(), CageError> {
        self.stats.max_depth_reached = self.stats.max_depth_reached.max(node.depth);

        if self.should_stop(&node.transform, node.depth) {
            log::trace!(
                "branch {:?} capped at depth {} (scale {:.4})",
                node.kind,
                node.depth,
                node.transform.max_scale()
            );
            self.cap(&node.ring);
            return Ok(());
        }

        let scale = node.transform.max_scale();
        self.stats.nodes_expanded += 1;
        self.stats.min_expanded_scale = Some(
            self.stats
                .min_expanded_scale
                .map_or(scale, |s| s.min(scale)),
        );

        for child in rule.expand(self, &node)? {
            self.grow(rule, child)?;
        }
        Ok(())
    }

    /// Grows a complete structure: the base polygon at the identity transform
    /// closed from below, then everything `rule` builds on top of it.
    pub fn run<R: BranchRule + ?Sized>(
        mut self,
        rule: &R,
        root: R::Kind,
    ) -> Result<(IndexedMesh, BranchStats), CageError> {
        let ring = self.push_ring(&Transform::identity());
        self.mesh.push_polygon(&ring);
        self.grow(
            rule,
            BranchNode {
                transform: Transform::identity(),
                ring,
                depth: 0,
                kind: root,
            },
        )?;
        log::debug!(
            "branch: {} nodes, {} rings, {} caps, depth {}",
            self.stats.nodes_expanded,
            self.stats.rings,
            self.stats.caps,
            self.stats.max_depth_reached
        );
        Ok((self.mesh, self.stats))
    }
}

/// A single horn: one ring per step, each placed by `incr` in the previous
/// ring's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StemRule {
    pub incr: Transform,
}

impl BranchRule for StemRule {
    type Kind = ();

    fn expand(
        &self,
        builder: &mut BranchBuilder,
        node: &BranchNode<()>,
    ) -> Result<Vec<BranchNode<()>>, CageError> {
        let xf = self.incr.compose(&node.transform);
        let ring = builder.extend_ring(&node.ring, &xf)?;
        Ok(vec![BranchNode {
            transform: xf,
            ring,
            depth: node.depth + 1,
            kind: (),
        }])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarbKind {
    Stem,
    Barb,
}

/// A stem whose every segment sprouts a barb from each of its four sides.
///
/// The stem itself adds no side faces: each side of a segment is the opening
/// ring of a barb, so a barb that stops at once leaves a flat quad there.
/// Assumes a four-sided base polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct BarbRule {
    pub stem_incr: Transform,
    pub barb_incr: Transform,
    /// Places the base polygon onto side `i` of a unit segment
    pub sides: [Transform; 4],
}

impl Default for BarbRule {
    fn default() -> Self {
        let side = |i: usize| {
            Transform::translation(0.5, 0.0, 0.5)
                .rotate(Vector3::y(), -FRAC_PI_2)
                .rotate(Vector3::z(), -(i as Real) * FRAC_PI_2)
        };
        BarbRule {
            stem_incr: Transform::uniform_scaling(0.95)
                .rotate(Vector3::x(), 0.1)
                .rotate(Vector3::z(), 0.15)
                .translate(0.0, 0.0, 1.0),
            barb_incr: Transform::uniform_scaling(0.8)
                .rotate(Vector3::y(), -0.2)
                .translate(0.0, 0.0, 0.5),
            sides: [side(0), side(1), side(2), side(3)],
        }
    }
}

impl BarbRule {
    /// Base polygon the default transforms are laid out for: the unit square
    /// wound clockwise seen from +Z, so its bottom cap faces down.
    pub fn base() -> Boundary {
        Boundary::square(1.0).reversed().roll(1)
    }
}

fn require_quad(base: &Boundary) -> Result<(), CageError> {
    if base.len() != 4 {
        return Err(CageError::BoundaryLengthMismatch {
            left: base.len(),
            right: 4,
        });
    }
    Ok(())
}

impl BranchRule for BarbRule {
    type Kind = BarbKind;

    fn expand(
        &self,
        builder: &mut BranchBuilder,
        node: &BranchNode<BarbKind>,
    ) -> Result<Vec<BranchNode<BarbKind>>, CageError> {
        require_quad(builder.base())?;
        let depth = node.depth + 1;
        match node.kind {
            BarbKind::Stem => {
                let xf = self.stem_incr.compose(&node.transform);
                let top = builder.push_ring(&xf);
                let b = &node.ring;

                let mut children = Vec::with_capacity(5);
                children.push(BranchNode {
                    transform: xf,
                    ring: top.clone(),
                    depth,
                    kind: BarbKind::Stem,
                });
                for (i, side) in self.sides.iter().enumerate() {
                    let j = (i + 1) % 4;
                    children.push(BranchNode {
                        transform: side.compose(&node.transform),
                        ring: vec![b[i], b[j], top[j], top[i]],
                        depth,
                        kind: BarbKind::Barb,
                    });
                }
                Ok(children)
            },
            BarbKind::Barb => {
                let xf = self.barb_incr.compose(&node.transform);
                let ring = builder.extend_ring(&node.ring, &xf)?;
                Ok(vec![BranchNode {
                    transform: xf,
                    ring,
                    depth,
                    kind: BarbKind::Barb,
                }])
            },
        }
    }
}

/// A trunk that grows `segment` rings, then splits into four half-size
/// quadrants that each start over.
///
/// The split takes one `incr` step like any other ring, but the new ring is
/// pushed subdivided (see [`BranchBuilder::split_ring`]) and its four quadrants
/// become the children's opening rings. The node kind counts the rings left
/// before the next split. Assumes [`TreeRule::base`].
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRule {
    pub incr: Transform,
    /// Places the base polygon onto quadrant `k` of itself
    pub splits: [Transform; 4],
    /// Rings grown between splits
    pub segment: usize,
}

impl Default for TreeRule {
    fn default() -> Self {
        let split = |k: usize| {
            Transform::uniform_scaling(0.5)
                .translate(0.25, 0.25, 0.0)
                .rotate(Vector3::z(), k as Real * FRAC_PI_2)
        };
        TreeRule {
            incr: Transform::uniform_scaling(0.97)
                .rotate(Vector3::new(-1.0, 0.0, 1.0), 0.24)
                .translate(0.0, 0.0, 0.54),
            splits: [split(0), split(1), split(2), split(3)],
            segment: 10,
        }
    }
}

impl TreeRule {
    /// Same layout as [`BarbRule::base`]; `splits[k]` maps it onto the quadrant
    /// around corner `(2 - k) mod 4`.
    pub fn base() -> Boundary {
        BarbRule::base()
    }
}

impl BranchRule for TreeRule {
    /// Rings left before the next split
    type Kind = usize;

    fn expand(
        &self,
        builder: &mut BranchBuilder,
        node: &BranchNode<usize>,
    ) -> Result<Vec<BranchNode<usize>>, CageError> {
        require_quad(builder.base())?;
        let depth = node.depth + 1;
        let xf = self.incr.compose(&node.transform);

        if node.kind > 0 {
            let ring = builder.extend_ring(&node.ring, &xf)?;
            return Ok(vec![BranchNode {
                transform: xf,
                ring,
                depth,
                kind: node.kind - 1,
            }]);
        }

        let (sub, centre) = builder.split_ring(&node.ring, &xf)?;
        // quadrant around corner q: centre, midpoint before q, q, midpoint after q
        let quadrant = |q: usize| vec![centre, sub[(2 * q + 7) % 8], sub[2 * q], sub[2 * q + 1]];
        Ok(self
            .splits
            .iter()
            .enumerate()
            .map(|(k, split)| BranchNode {
                transform: split.compose(&xf),
                ring: quadrant((6 - k) % 4),
                depth,
                kind: self.segment,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_unbounded_config() {
        let config = BranchConfig {
            scale_min: 0.0,
            max_depth: None,
        };
        assert!(BranchBuilder::new(Boundary::square(1.0), config).is_err());
        let config = BranchConfig {
            scale_min: 0.0,
            max_depth: Some(3),
        };
        assert!(BranchBuilder::new(Boundary::square(1.0), config).is_ok());
    }

    #[test]
    fn max_depth_limits_a_stem_that_never_shrinks() {
        let config = BranchConfig {
            scale_min: 0.5,
            max_depth: Some(5),
        };
        let rule = StemRule {
            incr: Transform::translation(0.0, 0.0, 1.0),
        };
        let (mesh, stats) = BranchBuilder::new(BarbRule::base(), config)
            .unwrap()
            .run(&rule, ())
            .unwrap();
        assert_eq!(stats.max_depth_reached, 5);
        assert_eq!(stats.rings, 6);
        assert_eq!(stats.caps, 1);
        // bottom and top caps of two triangles, eight per segment
        assert_eq!(mesh.face_count(), 2 + 5 * 8 + 2);
    }

    #[test]
    fn barb_base_matches_its_layout() {
        let base = BarbRule::base();
        assert_eq!(base[0], nalgebra::Point3::new(-0.5, -0.5, 0.0));
        assert_eq!(base[1], nalgebra::Point3::new(-0.5, 0.5, 0.0));
        assert!(base.newell_normal().z < 0.0);
    }

    #[test]
    fn extend_ring_rejects_a_ring_of_the_wrong_length() {
        let mut builder = BranchBuilder::new(BarbRule::base(), BranchConfig::default()).unwrap();
        let ring = builder.push_ring(&Transform::identity());
        let err = builder
            .extend_ring(&ring[..3], &Transform::translation(0.0, 0.0, 1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            CageError::BoundaryLengthMismatch { left: 3, right: 4 }
        ));
    }

    #[test]
    fn tree_splits_land_on_the_quadrants() {
        let rule = TreeRule::default();
        let base = TreeRule::base();
        let sub = base.subdivide();
        let centre = base.centroid();
        for (k, split) in rule.splits.iter().enumerate() {
            let q = (6 - k) % 4;
            let expected = [centre, sub[(2 * q + 7) % 8], sub[2 * q], sub[2 * q + 1]];
            for (placed, want) in split.apply_to(base.points()).iter().zip(expected) {
                assert!((placed - want).norm() < 1e-9, "split {k}: {placed} != {want}");
            }
        }
    }

    #[test]
    fn split_ring_bridges_every_side() {
        let mut builder = BranchBuilder::new(TreeRule::base(), BranchConfig::default()).unwrap();
        let ring = builder.push_ring(&Transform::identity());
        let (sub, centre) = builder
            .split_ring(&ring, &Transform::translation(0.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(sub.len(), 8);
        assert_eq!(centre, 4 + 8);
        assert_eq!(builder.mesh().vertex_count(), 4 + 9);
        // three triangles per side
        assert_eq!(builder.mesh().face_count(), 12);
    }
}
