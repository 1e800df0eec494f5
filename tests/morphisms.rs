//! Sheaf morphisms across module boundaries: naturality under composition
//! and the Godement unit.

use sheaf_sieve::prelude::*;
use std::collections::BTreeMap;

fn pid(id: u64) -> PointId {
    PointId::new(id).unwrap()
}

fn diamond() -> FinitePoset {
    let (a, b, c, d) = (pid(1), pid(2), pid(3), pid(4));
    FinitePoset::from_covers([], [(a, b), (a, c), (b, d), (c, d)]).unwrap()
}

fn scalar(p: &FinitePoset, s: &Sheaf, k: i64) -> SheafMorphism {
    let hom = SheafHomset::new(s, s).unwrap();
    hom.build(
        p.points()
            .map(|q| (q, ZMatrix::identity(s.stalk_rank(q).unwrap()).scaled(k)))
            .collect(),
    )
    .unwrap()
}

#[test]
fn composition_preserves_naturality() {
    let p = diamond();
    let s = Sheaf::constant(&p, 2);
    let two = scalar(&p, &s, 2);
    let three = scalar(&p, &s, 3);
    let six = two.then(&three).unwrap();
    // Rebuilding through the homset re-runs the naturality check.
    let hom = SheafHomset::new(&s, &s).unwrap();
    let rebuilt = hom
        .build(six.components().map(|(q, m)| (q, m.clone())).collect())
        .unwrap();
    assert_eq!(rebuilt, six);
    assert_eq!(
        six.component(pid(1)).unwrap(),
        &ZMatrix::identity(2).scaled(6)
    );
}

#[test]
fn inclusion_into_a_direct_sum_is_natural() {
    let p = diamond();
    let one = Sheaf::constant(&p, 1);
    let sum = one.direct_sum(&one).unwrap();
    let hom = SheafHomset::new(&one, &sum).unwrap();
    let incl = hom
        .build(
            p.points()
                .map(|q| {
                    (
                        q,
                        ZMatrix::from_rows(vec![vec![1], vec![0]]).unwrap(),
                    )
                })
                .collect(),
        )
        .unwrap();
    assert!(incl.is_injective());
    assert!(!incl.is_zero());
}

#[test]
fn godement_unit_is_injective_and_natural() {
    let p = diamond();
    // A non-constant but consistent sheaf: scale one side of the diamond.
    let (a, b, c, d) = (pid(1), pid(2), pid(3), pid(4));
    let m = |v: i64| RestrictionSpec::Explicit(ZMatrix::from_rows(vec![vec![v]]).unwrap());
    let s = Sheaf::new(
        BTreeMap::from([(a, 1), (b, 1), (c, 1), (d, 1)]),
        BTreeMap::from([((a, b), m(2)), ((a, c), m(3)), ((b, d), m(3)), ((c, d), m(2))]),
        None,
    )
    .unwrap();
    let (g0, unit) = s.godement_sheaf().unwrap();
    assert!(g0.is_valid());
    assert!(unit.is_injective());
    // The unit at the maximum is the identity on the lone stalk.
    assert_eq!(unit.component(d).unwrap(), &ZMatrix::identity(1));
    assert_eq!(unit.source(), &s);
    assert_eq!(unit.target(), &g0);
}

#[test]
fn zero_morphism_composes_to_zero() {
    let p = diamond();
    let s = Sheaf::constant(&p, 2);
    let hom = SheafHomset::new(&s, &s).unwrap();
    let z = hom.zero();
    let two = scalar(&p, &s, 2);
    assert!(z.then(&two).unwrap().is_zero());
    assert!(two.then(&z).unwrap().is_zero());
}
