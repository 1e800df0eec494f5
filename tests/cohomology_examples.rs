//! Worked cohomology examples with independently computed answers.

use sheaf_sieve::prelude::*;

fn pid(id: u64) -> PointId {
    PointId::new(id).unwrap()
}

fn chain(ids: &[u64]) -> FinitePoset {
    let points = ids.iter().map(|&id| pid(id));
    let covers = ids.windows(2).map(|w| (pid(w[0]), pid(w[1])));
    FinitePoset::from_covers(points, covers).unwrap()
}

/// a < b, c < d.
fn diamond() -> FinitePoset {
    let (a, b, c, d) = (pid(1), pid(2), pid(3), pid(4));
    FinitePoset::from_covers([], [(a, b), (a, c), (b, d), (c, d)]).unwrap()
}

/// a, b < c, d with all four relations: the poset model of a circle.
fn crown() -> FinitePoset {
    let (a, b, c, d) = (pid(1), pid(2), pid(3), pid(4));
    FinitePoset::from_covers([], [(a, c), (a, d), (b, c), (b, d)]).unwrap()
}

#[test]
fn constant_sheaf_on_a_chain() {
    for len in 1..=4u64 {
        let ids: Vec<u64> = (1..=len).collect();
        let s = Sheaf::constant(&chain(&ids), 1);
        let h = s.cohomology().unwrap();
        assert_eq!(h[&0].rank(), 1);
        for k in 1..len as i32 {
            assert!(h[&k].is_trivial(), "H^{k} of a chain should vanish");
        }
        assert_eq!(s.euler_characteristic().unwrap(), 1);
    }
}

#[test]
fn constant_sheaf_on_the_diamond() {
    let s = Sheaf::constant(&diamond(), 1);
    let c = s.godement_cochain_complex().unwrap();
    assert_eq!(c.rank(0), 4);
    assert_eq!(c.rank(1), 5);
    assert_eq!(c.rank(2), 2);
    let h = s.cohomology().unwrap();
    assert_eq!(h[&0].rank(), 1);
    assert!(h[&1].is_trivial());
    assert!(h[&2].is_trivial());
    assert_eq!(s.euler_characteristic().unwrap(), 1);
}

#[test]
fn crown_detects_the_circle() {
    let s = Sheaf::constant(&crown(), 1);
    let h = s.cohomology().unwrap();
    assert_eq!(h[&0].rank(), 1);
    assert_eq!(h[&1].rank(), 1);
    assert!(h[&1].torsion().is_empty());
    assert_eq!(s.euler_characteristic().unwrap(), 0);
}

#[test]
fn higher_rank_scales_linearly_on_the_crown() {
    let s = Sheaf::constant(&crown(), 3);
    let h = s.cohomology().unwrap();
    assert_eq!(h[&0].rank(), 3);
    assert_eq!(h[&1].rank(), 3);
    assert_eq!(s.euler_characteristic().unwrap(), 0);
}

#[test]
fn antichain_degenerates_to_global_products() {
    let p = FinitePoset::antichain([pid(1), pid(2), pid(3), pid(4)]);
    let s = Sheaf::constant(&p, 2);
    let h = s.cohomology().unwrap();
    assert_eq!(h.len(), 1);
    assert_eq!(h[&0].rank(), 8);
    assert_eq!(s.global_sections().unwrap().rank(), 8);
}

#[test]
fn euler_characteristic_matches_alternating_cochain_ranks() {
    // Over ZZ the alternating sum of Betti numbers equals the alternating
    // sum of cochain ranks; check on several shapes.
    for (poset, rank) in [
        (chain(&[1, 2, 3]), 2),
        (diamond(), 1),
        (crown(), 2),
    ] {
        let s = Sheaf::constant(&poset, rank);
        let c = s.godement_cochain_complex().unwrap();
        let from_ranks: i64 = c
            .degrees()
            .map(|k| {
                let sign = if k.rem_euclid(2) == 0 { 1 } else { -1 };
                sign * c.rank(k) as i64
            })
            .sum();
        assert_eq!(s.euler_characteristic().unwrap(), from_ranks);
    }
}

#[test]
fn non_constant_sheaf_with_torsion_free_answer() {
    // Rank-1 stalks on the 2-chain with multiplication by 2: H^0 picks out
    // the sections that restrict consistently, which is still free of rank 1.
    let (a, b) = (pid(1), pid(2));
    let stalks = std::collections::BTreeMap::from([(a, 1), (b, 1)]);
    let restrictions = std::collections::BTreeMap::from([(
        (a, b),
        RestrictionSpec::Explicit(ZMatrix::from_rows(vec![vec![2]]).unwrap()),
    )]);
    let s = Sheaf::new(stalks, restrictions, None).unwrap();
    let h = s.cohomology().unwrap();
    assert_eq!(h[&0].rank(), 1);
    assert!(h[&1].is_trivial());
}

#[test]
fn sections_over_open_sets_of_the_diamond() {
    let p = diamond();
    let s = Sheaf::constant(&p, 1);
    let top = p.order_filter([pid(4)]).unwrap();
    assert_eq!(s.sections(&top).unwrap().rank(), 1);
    // The two upper wedges overlap in the maximum; their union is connected.
    let wedge = p.order_filter([pid(2), pid(3)]).unwrap();
    assert_eq!(s.sections(&wedge).unwrap().rank(), 1);
}
