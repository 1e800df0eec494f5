//! SheafSieveError: unified error type for sheaf-sieve public APIs.
//!
//! Every fallible operation in the library reports through this enum so that
//! callers get robust, non-panicking error handling with enough context to fix
//! the offending mathematical input.

use crate::topology::point::PointId;
use thiserror::Error;

/// Unified error type for sheaf-sieve operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SheafSieveError {
    /// Attempted to construct a PointId with a zero value (invalid).
    #[error("PointId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidPointId,
    /// Cover-relation data references a point with no stalk rank, has ragged
    /// shape, or otherwise fails to determine a poset.
    #[error("data does not determine a sheaf on a poset: {0}")]
    MalformedPosetData(String),
    /// The cover relations contain a directed cycle; expected a partial order.
    #[error("cycle detected in cover relations (expected a partial order)")]
    CycleDetected,
    /// A supplied edge admits a point strictly between its endpoints.
    #[error("edge ({0}, {1}) is not a cover relation: a point lies strictly between")]
    NotACoverRelation(PointId, PointId),
    /// A point outside the domain poset was passed to an operation.
    #[error("point {0} is not in the domain poset")]
    UnknownPoint(PointId),
    /// The supplied poset is not isomorphic to the one implied by the data.
    #[error("supplied poset is not isomorphic to the poset implied by the restriction data")]
    PosetMismatch,
    /// Two maximal-length chains between the same pair of points compose to
    /// different restriction matrices.
    #[error("sheaf axiom violated: maximal chains from {from} to {to} give different composites")]
    SheafAxiomViolation { from: PointId, to: PointId },
    /// Morphism component data fails the cover-relation compatibility check.
    #[error("naturality violated at cover relation ({src}, {dst})")]
    NaturalityViolation { src: PointId, dst: PointId },
    /// `restriction(x, y)` was queried for an incomparable (or equal) pair.
    #[error("{from} is not strictly below {to} in the domain poset")]
    NotComparable { from: PointId, to: PointId },
    /// `restrict_to` was given a set some relation leaves.
    #[error("set is not upward closed: relation ({src}, {dst}) leaves it")]
    NotUpwardClosed { src: PointId, dst: PointId },
    /// A poset map is not an injective, order-preserving and -reflecting embedding.
    #[error("the poset map is not an order embedding")]
    NotAnEmbedding,
    /// The image of an embedding is not an open (upward-closed) subset.
    #[error("embedding image is not upward closed in the codomain poset")]
    ImageNotUpwardClosed,
    /// No stalk rank was supplied for a poset point.
    #[error("missing stalk rank for point {0}")]
    MissingStalk(PointId),
    /// No restriction spec was supplied for a cover relation.
    #[error("missing restriction for cover relation ({0}, {1})")]
    MissingCoverRestriction(PointId, PointId),
    /// No morphism component was supplied for a poset point.
    #[error("missing morphism component for point {0}")]
    MissingComponent(PointId),
    /// A restriction matrix has the wrong shape for its cover relation.
    #[error(
        "restriction for cover ({src}, {dst}) has shape {found_rows}x{found_cols}, expected {rows}x{cols}"
    )]
    RestrictionShape {
        src: PointId,
        dst: PointId,
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
    /// An identity sentinel was used where the stalk ranks differ.
    #[error("identity restriction for cover ({src}, {dst}) needs equal ranks ({from_rank} vs {to_rank})")]
    IdentityRankMismatch {
        src: PointId,
        dst: PointId,
        from_rank: usize,
        to_rank: usize,
    },
    /// Matrix shapes are incompatible for the requested operation.
    #[error("matrix shape mismatch in {op}: {lhs_rows}x{lhs_cols} vs {rhs_rows}x{rhs_cols}")]
    MatrixShapeMismatch {
        op: &'static str,
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },
    /// A morphism component matrix has the wrong shape at a point.
    #[error("component at {point} has shape {found_rows}x{found_cols}, expected {rows}x{cols}")]
    ComponentShape {
        point: PointId,
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
    /// Two sheaves that must share a domain poset (and stalk data) do not.
    #[error("sheaves live on different posets or have mismatched stalk data")]
    SheafMismatch,
    /// Morphism composition with mismatched middle sheaf.
    #[error("cannot compose: codomain of the first morphism differs from domain of the second")]
    NonComposableMorphisms,
    /// Adjacent differentials fail to compose to the zero map.
    #[error("differentials at degrees {lower} and {lower_plus_one} do not compose to zero")]
    DifferentialSquareNonzero { lower: i32, lower_plus_one: i32 },
    /// A differential does not connect the complex's adjacent terms.
    #[error("differential at degree {degree} does not match the adjacent terms of the complex")]
    DifferentialMismatch { degree: i32 },
    /// Operation defined only for restricted inputs (e.g. pushforward from a
    /// non-singleton poset).
    #[error("unsupported sheaf operation: {0}")]
    UnsupportedSheafOperation(&'static str),
}
