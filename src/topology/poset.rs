//! `FinitePoset`: finite partially ordered sets built from cover relations.
//!
//! A poset is constructed once from its Hasse diagram (points plus cover
//! relations) and is immutable afterwards. Construction validates that the
//! data is acyclic and that every supplied edge really is a cover relation
//! (no point strictly between its endpoints). Derived combinatorial data —
//! the strict-order closure, the chain enumeration, the height — is computed
//! up front or cached on first use, which is sound because the structure
//! never changes.
//!
//! Chains are *totally ordered subsets*, not paths in the Hasse diagram; the
//! saturated paths used to compose sheaf restrictions are exposed separately
//! as [`FinitePoset::cover_paths`].

use crate::sheaf_error::SheafSieveError;
use crate::topology::point::PointId;
use itertools::Itertools;
use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A finite partially ordered set.
///
/// # Invariants
/// - `points` is sorted and duplicate-free.
/// - `covers_up`/`covers_down` describe the same Hasse diagram, every edge of
///   which is a genuine cover relation of the transitive closure.
/// - `above[p]` / `below[p]` are the strict up/down closures of `p`.
/// - The cover digraph is acyclic.
#[derive(Clone, Debug)]
pub struct FinitePoset {
    points: Vec<PointId>,
    covers_up: BTreeMap<PointId, Vec<PointId>>,
    covers_down: BTreeMap<PointId, Vec<PointId>>,
    above: BTreeMap<PointId, BTreeSet<PointId>>,
    below: BTreeMap<PointId, BTreeSet<PointId>>,
    height: u32,
    chains: OnceCell<Vec<Vec<PointId>>>,
}

impl PartialEq for FinitePoset {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points && self.covers_up == other.covers_up
    }
}

impl Eq for FinitePoset {}

impl FinitePoset {
    /// Build a poset from explicit points and cover relations.
    ///
    /// Points appearing only as edge endpoints are added automatically.
    ///
    /// # Errors
    /// - `MalformedPosetData` for self-loops.
    /// - `CycleDetected` if the edges contain a directed cycle.
    /// - `NotACoverRelation(a, b)` if some point lies strictly between `a`
    ///   and `b`, i.e. the edge is transitive rather than a cover.
    ///
    /// # Determinism
    /// All internal orderings are by `PointId`; identical input data yields
    /// identical enumeration orders.
    pub fn from_covers(
        points: impl IntoIterator<Item = PointId>,
        covers: impl IntoIterator<Item = (PointId, PointId)>,
    ) -> Result<Self, SheafSieveError> {
        let mut point_set: BTreeSet<PointId> = points.into_iter().collect();
        let mut edges: BTreeSet<(PointId, PointId)> = BTreeSet::new();
        for (a, b) in covers {
            if a == b {
                return Err(SheafSieveError::MalformedPosetData(format!(
                    "self-loop at point {a}"
                )));
            }
            point_set.insert(a);
            point_set.insert(b);
            edges.insert((a, b));
        }

        let mut covers_up: BTreeMap<PointId, Vec<PointId>> = BTreeMap::new();
        let mut covers_down: BTreeMap<PointId, Vec<PointId>> = BTreeMap::new();
        for &p in &point_set {
            covers_up.insert(p, Vec::new());
            covers_down.insert(p, Vec::new());
        }
        for &(a, b) in &edges {
            covers_up.get_mut(&a).expect("endpoint registered").push(b);
            covers_down.get_mut(&b).expect("endpoint registered").push(a);
        }

        let topo = topological_order(&point_set, &covers_down)?;

        // Strict closures, sinks-first for `above`, sources-first for `below`.
        let mut above: BTreeMap<PointId, BTreeSet<PointId>> = BTreeMap::new();
        for &p in topo.iter().rev() {
            let mut acc = BTreeSet::new();
            for &q in &covers_up[&p] {
                acc.insert(q);
                acc.extend(above[&q].iter().copied());
            }
            above.insert(p, acc);
        }
        let mut below: BTreeMap<PointId, BTreeSet<PointId>> = BTreeMap::new();
        for &p in &topo {
            let mut acc = BTreeSet::new();
            for &q in &covers_down[&p] {
                acc.insert(q);
                acc.extend(below[&q].iter().copied());
            }
            below.insert(p, acc);
        }

        // Every edge must be a cover of the closure it generates.
        for &(a, b) in &edges {
            let transitive = above[&a]
                .iter()
                .any(|&z| z != b && above[&z].contains(&b));
            if transitive {
                return Err(SheafSieveError::NotACoverRelation(a, b));
            }
        }

        // Height in points of the longest chain, via DP along the topo order.
        let mut down_height: BTreeMap<PointId, u32> = BTreeMap::new();
        let mut height = 0u32;
        for &p in &topo {
            let h = 1 + covers_down[&p]
                .iter()
                .map(|q| down_height[q])
                .max()
                .unwrap_or(0);
            height = height.max(h);
            down_height.insert(p, h);
        }

        Ok(Self {
            points: point_set.into_iter().collect(),
            covers_up,
            covers_down,
            above,
            below,
            height,
            chains: OnceCell::new(),
        })
    }

    /// The one-point poset on `p`.
    pub fn singleton(p: PointId) -> Self {
        Self::from_covers([p], []).expect("singleton data is always valid")
    }

    /// The poset with the given points and no relations.
    pub fn antichain(points: impl IntoIterator<Item = PointId>) -> Self {
        Self::from_covers(points, []).expect("antichain data is always valid")
    }

    /// All points in ascending id order.
    #[inline]
    pub fn points(&self) -> impl Iterator<Item = PointId> + '_ {
        self.points.iter().copied()
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the poset has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `p` is a point of this poset.
    #[inline]
    pub fn contains(&self, p: PointId) -> bool {
        self.above.contains_key(&p)
    }

    /// Strict comparability: `a < b`.
    #[inline]
    pub fn is_less_than(&self, a: PointId, b: PointId) -> bool {
        self.above.get(&a).is_some_and(|s| s.contains(&b))
    }

    /// Non-strict comparability: `a <= b`.
    #[inline]
    pub fn is_less_equal(&self, a: PointId, b: PointId) -> bool {
        (a == b && self.contains(a)) || self.is_less_than(a, b)
    }

    /// All strict order relations `(x, y)` with `x < y`, sorted.
    pub fn relations(&self) -> Vec<(PointId, PointId)> {
        self.points
            .iter()
            .flat_map(|&x| self.above[&x].iter().map(move |&y| (x, y)))
            .collect()
    }

    /// All cover relations `(x, y)`, sorted by `(x, y)`.
    pub fn cover_relations(&self) -> Vec<(PointId, PointId)> {
        self.covers_up
            .iter()
            .flat_map(|(&x, ys)| ys.iter().map(move |&y| (x, y)))
            .collect()
    }

    /// Points covering `p`.
    pub fn upper_covers(&self, p: PointId) -> impl Iterator<Item = PointId> + '_ {
        self.covers_up.get(&p).into_iter().flatten().copied()
    }

    /// Points covered by `p`.
    pub fn lower_covers(&self, p: PointId) -> impl Iterator<Item = PointId> + '_ {
        self.covers_down.get(&p).into_iter().flatten().copied()
    }

    /// Points with no lower covers.
    pub fn minimal_points(&self) -> impl Iterator<Item = PointId> + '_ {
        self.points().filter(|p| self.below[p].is_empty())
    }

    /// Points with no upper covers.
    pub fn maximal_points(&self) -> impl Iterator<Item = PointId> + '_ {
        self.points().filter(|p| self.above[p].is_empty())
    }

    /// All non-empty chains (totally ordered subsets), each listed in
    /// ascending order, the whole enumeration in lexicographic order.
    ///
    /// Cached on first use; the poset is immutable so the cache never goes
    /// stale.
    ///
    /// # Complexity
    /// Exponential in the poset width; posets in scope here are small.
    pub fn chains(&self) -> &[Vec<PointId>] {
        self.chains.get_or_init(|| {
            let mut out = Vec::new();
            let mut prefix = Vec::new();
            for &p in &self.points {
                self.extend_chains(p, &mut prefix, &mut out);
            }
            out
        })
    }

    fn extend_chains(&self, p: PointId, prefix: &mut Vec<PointId>, out: &mut Vec<Vec<PointId>>) {
        prefix.push(p);
        out.push(prefix.clone());
        // `above` iterates ascending, so enumeration stays lexicographic.
        for &q in &self.above[&p] {
            self.extend_chains(q, prefix, out);
        }
        prefix.pop();
    }

    /// All chains with exactly `k` points, in canonical (lexicographic) order.
    pub fn chains_of_len(&self, k: usize) -> Vec<Vec<PointId>> {
        self.chains()
            .iter()
            .filter(|c| c.len() == k)
            .cloned()
            .collect()
    }

    /// All maximal chains: saturated chains from a minimal point to a maximal
    /// point, in lexicographic order.
    pub fn maximal_chains(&self) -> Vec<Vec<PointId>> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        for p in self.minimal_points().collect_vec() {
            self.extend_saturated(p, &mut prefix, &mut out);
        }
        out
    }

    fn extend_saturated(&self, p: PointId, prefix: &mut Vec<PointId>, out: &mut Vec<Vec<PointId>>) {
        prefix.push(p);
        if self.covers_up[&p].is_empty() {
            out.push(prefix.clone());
        } else {
            for &q in &self.covers_up[&p] {
                self.extend_saturated(q, prefix, out);
            }
        }
        prefix.pop();
    }

    /// All saturated chains from `x` to `y` (paths in the Hasse diagram).
    ///
    /// Returns the empty vector when `x ⊀ y`. The maximal-length chains
    /// between `x` and `y` are exactly the longest entries here, and the
    /// enumeration order is deterministic (DFS in ascending cover order).
    pub fn cover_paths(&self, x: PointId, y: PointId) -> Vec<Vec<PointId>> {
        let mut out = Vec::new();
        if !self.is_less_than(x, y) {
            return out;
        }
        let mut prefix = Vec::new();
        self.extend_paths(x, y, &mut prefix, &mut out);
        out
    }

    fn extend_paths(
        &self,
        p: PointId,
        target: PointId,
        prefix: &mut Vec<PointId>,
        out: &mut Vec<Vec<PointId>>,
    ) {
        prefix.push(p);
        if p == target {
            out.push(prefix.clone());
        } else {
            for &q in &self.covers_up[&p] {
                if q == target || self.is_less_than(q, target) {
                    self.extend_paths(q, target, prefix, out);
                }
            }
        }
        prefix.pop();
    }

    /// Upward closure of `seeds`: every point `q` with `s <= q` for some seed.
    ///
    /// # Errors
    /// `UnknownPoint` if a seed is not in the poset.
    pub fn order_filter(
        &self,
        seeds: impl IntoIterator<Item = PointId>,
    ) -> Result<BTreeSet<PointId>, SheafSieveError> {
        let mut out = BTreeSet::new();
        for s in seeds {
            let up = self.above.get(&s).ok_or(SheafSieveError::UnknownPoint(s))?;
            out.insert(s);
            out.extend(up.iter().copied());
        }
        Ok(out)
    }

    /// Downward closure of `seeds`: every point `q` with `q <= s` for some seed.
    ///
    /// # Errors
    /// `UnknownPoint` if a seed is not in the poset.
    pub fn order_ideal(
        &self,
        seeds: impl IntoIterator<Item = PointId>,
    ) -> Result<BTreeSet<PointId>, SheafSieveError> {
        let mut out = BTreeSet::new();
        for s in seeds {
            let down = self.below.get(&s).ok_or(SheafSieveError::UnknownPoint(s))?;
            out.insert(s);
            out.extend(down.iter().copied());
        }
        Ok(out)
    }

    /// Length of the longest chain, counted in points. Zero for the empty poset.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The induced sub-poset on an upward-closed set.
    ///
    /// # Errors
    /// - `UnknownPoint` for a set member outside the poset.
    /// - `NotUpwardClosed` naming the first relation leaving the set.
    pub fn induced_filter(
        &self,
        set: &BTreeSet<PointId>,
    ) -> Result<FinitePoset, SheafSieveError> {
        for &p in set {
            let up = self.above.get(&p).ok_or(SheafSieveError::UnknownPoint(p))?;
            if let Some(&q) = up.iter().find(|q| !set.contains(q)) {
                return Err(SheafSieveError::NotUpwardClosed { src: p, dst: q });
            }
        }
        // Covers inside an upward-closed set are exactly the ambient covers
        // with their source in the set.
        let covers = self
            .cover_relations()
            .into_iter()
            .filter(|(a, _)| set.contains(a));
        FinitePoset::from_covers(set.iter().copied(), covers)
    }

    /// Order-isomorphism test by backtracking over invariant-compatible
    /// candidates.
    ///
    /// # Complexity
    /// Worst-case exponential; the degree/closure-size invariants prune hard
    /// for the poset sizes in scope.
    pub fn is_isomorphic(&self, other: &FinitePoset) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let key = |poset: &FinitePoset, p: PointId| {
            (
                poset.covers_up[&p].len(),
                poset.covers_down[&p].len(),
                poset.above[&p].len(),
                poset.below[&p].len(),
            )
        };
        let mut ours = self.points.clone();
        // Rarest invariant classes first keeps the search shallow.
        let mut class_size: BTreeMap<_, usize> = BTreeMap::new();
        for &p in &other.points {
            *class_size.entry(key(other, p)).or_insert(0) += 1;
        }
        for &p in &ours {
            if !class_size.contains_key(&key(self, p)) {
                return false;
            }
        }
        ours.sort_by_key(|&p| class_size[&key(self, p)]);

        let mut map: BTreeMap<PointId, PointId> = BTreeMap::new();
        let mut used: BTreeSet<PointId> = BTreeSet::new();
        self.try_extend_iso(other, &ours, 0, &mut map, &mut used, &key)
    }

    fn try_extend_iso(
        &self,
        other: &FinitePoset,
        ours: &[PointId],
        idx: usize,
        map: &mut BTreeMap<PointId, PointId>,
        used: &mut BTreeSet<PointId>,
        key: &impl Fn(&FinitePoset, PointId) -> (usize, usize, usize, usize),
    ) -> bool {
        if idx == ours.len() {
            return true;
        }
        let p = ours[idx];
        let pk = key(self, p);
        for &q in &other.points {
            if used.contains(&q) || key(other, q) != pk {
                continue;
            }
            let consistent = map.iter().all(|(&a, &fa)| {
                self.is_less_than(a, p) == other.is_less_than(fa, q)
                    && self.is_less_than(p, a) == other.is_less_than(q, fa)
            });
            if !consistent {
                continue;
            }
            map.insert(p, q);
            used.insert(q);
            if self.try_extend_iso(other, ours, idx + 1, map, used, key) {
                return true;
            }
            map.remove(&p);
            used.remove(&q);
        }
        false
    }
}

/// Kahn-style topological order over the cover digraph.
///
/// # Errors
/// `CycleDetected` if some points are never drained.
fn topological_order(
    points: &BTreeSet<PointId>,
    covers_down: &BTreeMap<PointId, Vec<PointId>>,
) -> Result<Vec<PointId>, SheafSieveError> {
    let mut indegree: BTreeMap<PointId, usize> =
        points.iter().map(|&p| (p, covers_down[&p].len())).collect();
    let mut up: BTreeMap<PointId, Vec<PointId>> = points.iter().map(|&p| (p, vec![])).collect();
    for (&p, lows) in covers_down {
        for &q in lows {
            up.get_mut(&q).expect("endpoint registered").push(p);
        }
    }
    let mut queue: VecDeque<PointId> = indegree
        .iter()
        .filter(|&(_, &d)| d == 0)
        .map(|(&p, _)| p)
        .collect();
    let mut order = Vec::with_capacity(points.len());
    while let Some(p) = queue.pop_front() {
        order.push(p);
        for &q in &up[&p] {
            let d = indegree.get_mut(&q).expect("endpoint registered");
            *d -= 1;
            if *d == 0 {
                queue.push_back(q);
            }
        }
    }
    if order.len() != points.len() {
        return Err(SheafSieveError::CycleDetected);
    }
    Ok(order)
}
