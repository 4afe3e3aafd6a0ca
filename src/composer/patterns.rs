//! Individual pattern finders. Each starts from a small anchor edge (an
//! opposition, sextile, or conjunction) and grows outward rather than
//! enumerating every `C(n, k)` k-subset of the full body set. A cheap
//! pre-filter (restricting candidates to bodies that
//! actually carry an edge of a relevant kind) bounds the combinatorial
//! checks for the 5- and 6-body patterns before the full predicate runs.

use super::{sorted, PatternOrbConfig};
use crate::angle::combinations;
use crate::aspect::AspectKind;
use crate::body::Body;
use crate::event::PatternKind;
use crate::graph::AspectEdge;
use itertools::Itertools;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternMatch {
    pub pattern: PatternKind,
    pub bodies: Vec<Body>,
    pub focal: Option<Body>,
}

fn edges_of_kind(edges: &[AspectEdge], kind: AspectKind) -> Vec<&AspectEdge> {
    edges.iter().filter(|e| e.kind == kind).collect()
}

/// `true` iff `a`-`b` carries an edge of `kind` whose raw separation still
/// falls within the composer's own (wider, independently configurable)
/// orb, not just the pairwise detector's orb baked into `e.kind` (per
/// `DESIGN.md`'s Open Question decision #1).
fn is_kind(edges: &[AspectEdge], a: Body, b: Body, kind: AspectKind, orb: f64) -> bool {
    let (a, b) = crate::body::canonical_pair(a, b);
    edges
        .iter()
        .any(|e| e.body1 == a && e.body2 == b && e.kind == kind && kind.in_orb(e.separation, orb))
}

/// All unordered pairs within a small body slice, used instead of
/// `Itertools::tuple_combinations` for the fixed pair-count checks below,
/// where the slice length (5 or 6) is known and small.
fn all_pairs(bodies: &[Body]) -> Vec<(Body, Body)> {
    let mut pairs = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            pairs.push((bodies[i], bodies[j]));
        }
    }
    pairs
}

/// Bodies that appear in at least one edge of any of `kinds`: the cheap
/// pre-filter candidate pool for the 5- and 6-body composers.
fn candidates_with_kinds(edges: &[AspectEdge], kinds: &[AspectKind]) -> Vec<Body> {
    let mut bodies: Vec<Body> = edges
        .iter()
        .filter(|e| kinds.contains(&e.kind))
        .flat_map(|e| [e.body1, e.body2])
        .unique()
        .collect();
    bodies.sort();
    bodies
}

/// Run every structured-pattern finder (3..6-body) over a single edge
/// snapshot.
pub fn find_all(edges: &[AspectEdge], orbs: PatternOrbConfig) -> Vec<PatternMatch> {
    let mut matches = Vec::new();
    matches.extend(find_t_squares(edges, orbs.orb));
    matches.extend(find_yods(edges, orbs.orb));
    let grand_trines = find_grand_trines(edges, orbs.orb);
    matches.extend(find_kites(edges, &grand_trines, orbs.orb));
    matches.extend(grand_trines);
    matches.extend(find_grand_crosses(edges, orbs.orb));
    matches.extend(find_pentagrams(edges, orbs.orb));
    matches.extend(find_hexagrams(edges, orbs.orb));
    matches
}

/// Anchor: one opposition `(a,b)`; grow: squares `(a,c)` and `(b,c)` for
/// some third body `c`, which becomes the focal point.
fn find_t_squares(edges: &[AspectEdge], orb: f64) -> Vec<PatternMatch> {
    let mut out = Vec::new();
    for opp in edges_of_kind(edges, AspectKind::Opposition) {
        for body in Body::ALL {
            if body == opp.body1 || body == opp.body2 {
                continue;
            }
            if is_kind(edges, opp.body1, body, AspectKind::Square, orb)
                && is_kind(edges, opp.body2, body, AspectKind::Square, orb)
            {
                out.push(PatternMatch {
                    pattern: PatternKind::TSquare,
                    bodies: sorted(vec![opp.body1, opp.body2, body]),
                    focal: Some(body),
                });
            }
        }
    }
    out.into_iter().unique().collect()
}

/// Anchor: one sextile `(a,b)`; grow: quincunxes `(a,c)` and `(b,c)` for
/// some apex body `c`.
fn find_yods(edges: &[AspectEdge], orb: f64) -> Vec<PatternMatch> {
    let mut out = Vec::new();
    for sex in edges_of_kind(edges, AspectKind::Sextile) {
        for body in Body::ALL {
            if body == sex.body1 || body == sex.body2 {
                continue;
            }
            if is_kind(edges, sex.body1, body, AspectKind::Quincunx, orb)
                && is_kind(edges, sex.body2, body, AspectKind::Quincunx, orb)
            {
                out.push(PatternMatch {
                    pattern: PatternKind::Yod,
                    bodies: sorted(vec![sex.body1, sex.body2, body]),
                    focal: Some(body),
                });
            }
        }
    }
    out.into_iter().unique().collect()
}

/// Anchor: one trine `(a,b)`; grow: a third body trine to both.
fn find_grand_trines(edges: &[AspectEdge], orb: f64) -> Vec<PatternMatch> {
    let mut out = Vec::new();
    for tri in edges_of_kind(edges, AspectKind::Trine) {
        for body in Body::ALL {
            if body == tri.body1 || body == tri.body2 {
                continue;
            }
            if is_kind(edges, tri.body1, body, AspectKind::Trine, orb)
                && is_kind(edges, tri.body2, body, AspectKind::Trine, orb)
            {
                out.push(PatternMatch {
                    pattern: PatternKind::GrandTrine,
                    bodies: sorted(vec![tri.body1, tri.body2, body]),
                    focal: None,
                });
            }
        }
    }
    out.into_iter().unique().collect()
}

/// Anchor: two distinct oppositions on four distinct bodies; grow: verify
/// all four non-opposition cross-pairs are squares.
fn find_grand_crosses(edges: &[AspectEdge], orb: f64) -> Vec<PatternMatch> {
    let oppositions = edges_of_kind(edges, AspectKind::Opposition);
    let mut out = Vec::new();
    for pair in combinations(&oppositions, 2) {
        let (o1, o2) = (pair[0], pair[1]);
        let bodies = [o1.body1, o1.body2, o2.body1, o2.body2];
        if bodies.iter().unique().count() != 4 {
            continue;
        }
        let (a, b, c, d) = (o1.body1, o1.body2, o2.body1, o2.body2);
        let all_squares = [(a, c), (a, d), (b, c), (b, d)]
            .iter()
            .all(|(x, y)| is_kind(edges, *x, *y, AspectKind::Square, orb));
        if all_squares {
            out.push(PatternMatch {
                pattern: PatternKind::GrandCross,
                bodies: sorted(vec![a, b, c, d]),
                focal: None,
            });
        }
    }
    out.into_iter().unique().collect()
}

/// Grow on top of an already-found grand trine `{a,b,c}`: a fourth body
/// `d` opposite exactly one of the triangle's points (`base`) and sextile
/// to the other two. Apex is `d`.
fn find_kites(edges: &[AspectEdge], grand_trines: &[PatternMatch], orb: f64) -> Vec<PatternMatch> {
    let mut out = Vec::new();
    for gt in grand_trines {
        let [a, b, c]: [Body; 3] = gt.bodies.clone().try_into().unwrap();
        for d in Body::ALL {
            if [a, b, c].contains(&d) {
                continue;
            }
            for base in [a, b, c] {
                let others: Vec<Body> = [a, b, c].into_iter().filter(|&x| x != base).collect();
                if is_kind(edges, base, d, AspectKind::Opposition, orb)
                    && is_kind(edges, others[0], d, AspectKind::Sextile, orb)
                    && is_kind(edges, others[1], d, AspectKind::Sextile, orb)
                {
                    out.push(PatternMatch {
                        pattern: PatternKind::Kite,
                        bodies: sorted(vec![a, b, c, d]),
                        focal: Some(d),
                    });
                }
            }
        }
    }
    out.into_iter().unique().collect()
}

/// All 5-body subsets of the quintile/biquintile candidate pool whose 10
/// pairs are all quintile or biquintile.
fn find_pentagrams(edges: &[AspectEdge], orb: f64) -> Vec<PatternMatch> {
    let pool = candidates_with_kinds(edges, &[AspectKind::Quintile, AspectKind::Biquintile]);
    let mut out = Vec::new();
    for group in combinations(&pool, 5) {
        let all_pairs_ok = all_pairs(&group).iter().all(|(x, y)| {
            is_kind(edges, *x, *y, AspectKind::Quintile, orb)
                || is_kind(edges, *x, *y, AspectKind::Biquintile, orb)
        });
        if all_pairs_ok {
            out.push(PatternMatch {
                pattern: PatternKind::Pentagram,
                bodies: sorted(group),
                focal: None,
            });
        }
    }
    out
}

/// All 6-body subsets of the trine/sextile/opposition candidate pool whose
/// 15 pairs break down exactly as 3 oppositions + 6 trines + 6 sextiles:
/// the canonical hexagram (two interlocking grand trines plus the three
/// diameters).
fn find_hexagrams(edges: &[AspectEdge], orb: f64) -> Vec<PatternMatch> {
    let pool = candidates_with_kinds(
        edges,
        &[AspectKind::Trine, AspectKind::Sextile, AspectKind::Opposition],
    );
    let mut out = Vec::new();
    for group in combinations(&pool, 6) {
        let mut opp = 0;
        let mut tri = 0;
        let mut sex = 0;
        let mut all_classified = true;
        for (x, y) in all_pairs(&group) {
            if is_kind(edges, x, y, AspectKind::Opposition, orb) {
                opp += 1;
            } else if is_kind(edges, x, y, AspectKind::Trine, orb) {
                tri += 1;
            } else if is_kind(edges, x, y, AspectKind::Sextile, orb) {
                sex += 1;
            } else {
                all_classified = false;
                break;
            }
        }
        if all_classified && opp == 3 && tri == 6 && sex == 6 {
            out.push(PatternMatch {
                pattern: PatternKind::Hexagram,
                bodies: sorted(group),
                focal: None,
            });
        }
    }
    out
}

/// Connected components of the conjunction subgraph, verified as complete
/// cliques of size >= 3 (per `DESIGN.md`, the "connected components then
/// clique verification" strategy used for stelliums).
pub fn find_stelliums(edges: &[AspectEdge], orb: f64) -> Vec<Vec<Body>> {
    let conj: Vec<&AspectEdge> = edges_of_kind(edges, AspectKind::Conjunction)
        .into_iter()
        .filter(|e| AspectKind::Conjunction.in_orb(e.separation, orb))
        .collect();
    let nodes: Vec<Body> = conj.iter().flat_map(|e| [e.body1, e.body2]).unique().collect();

    let mut visited = std::collections::HashSet::new();
    let mut components: Vec<Vec<Body>> = Vec::new();
    for &start in &nodes {
        if visited.contains(&start) {
            continue;
        }
        let mut component = vec![start];
        visited.insert(start);
        let mut frontier = vec![start];
        while let Some(cur) = frontier.pop() {
            for e in &conj {
                let neighbor = if e.body1 == cur {
                    Some(e.body2)
                } else if e.body2 == cur {
                    Some(e.body1)
                } else {
                    None
                };
                if let Some(n) = neighbor {
                    if visited.insert(n) {
                        component.push(n);
                        frontier.push(n);
                    }
                }
            }
        }
        components.push(component);
    }

    components
        .into_iter()
        .filter(|c| c.len() >= 3)
        .filter(|c| {
            all_pairs(c)
                .iter()
                .all(|(x, y)| is_kind(edges, *x, *y, AspectKind::Conjunction, orb))
        })
        .map(sorted)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;
    use chrono::DateTime;
    use chrono::Utc;

    fn edge(a: Body, b: Body, kind: AspectKind) -> AspectEdge {
        let (a, b) = crate::body::canonical_pair(a, b);
        let t: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        AspectEdge {
            body1: a,
            body2: b,
            kind,
            phase: Phase::None,
            separation: kind.target(),
            start: t,
            end: t,
        }
    }

    #[test]
    fn t_square_focal_is_squared_body() {
        let edges = vec![
            edge(Body::Sun, Body::Moon, AspectKind::Opposition),
            edge(Body::Sun, Body::Mars, AspectKind::Square),
            edge(Body::Moon, Body::Mars, AspectKind::Square),
        ];
        let found = find_t_squares(&edges, 8.0);
        assert_eq!(1, found.len());
        assert_eq!(Some(Body::Mars), found[0].focal);
    }

    #[test]
    fn grand_trine_needs_three_mutual_trines() {
        let edges = vec![
            edge(Body::Sun, Body::Moon, AspectKind::Trine),
            edge(Body::Sun, Body::Mars, AspectKind::Trine),
            edge(Body::Moon, Body::Mars, AspectKind::Trine),
        ];
        let found = find_grand_trines(&edges, 8.0);
        assert_eq!(1, found.len());
        assert_eq!(vec![Body::Sun, Body::Moon, Body::Mars], found[0].bodies);
    }

    #[test]
    fn grand_cross_requires_four_distinct_bodies_and_all_squares() {
        let edges = vec![
            edge(Body::Sun, Body::Moon, AspectKind::Opposition),
            edge(Body::Mars, Body::Jupiter, AspectKind::Opposition),
            edge(Body::Sun, Body::Mars, AspectKind::Square),
            edge(Body::Sun, Body::Jupiter, AspectKind::Square),
            edge(Body::Moon, Body::Mars, AspectKind::Square),
            edge(Body::Moon, Body::Jupiter, AspectKind::Square),
        ];
        let found = find_grand_crosses(&edges, 8.0);
        assert_eq!(1, found.len());
    }

    #[test]
    fn stellium_requires_complete_conjunction_clique() {
        let edges = vec![
            edge(Body::Sun, Body::Mercury, AspectKind::Conjunction),
            edge(Body::Sun, Body::Venus, AspectKind::Conjunction),
            edge(Body::Mercury, Body::Venus, AspectKind::Conjunction),
        ];
        let found = find_stelliums(&edges, 8.0);
        assert_eq!(1, found.len());
        assert_eq!(3, found[0].len());
    }

    #[test]
    fn stellium_not_formed_when_not_fully_conjunct() {
        // Sun-Mercury and Sun-Venus conjunct but Mercury-Venus is not: no
        // complete clique among the three, so no stellium.
        let edges = vec![
            edge(Body::Sun, Body::Mercury, AspectKind::Conjunction),
            edge(Body::Sun, Body::Venus, AspectKind::Conjunction),
        ];
        let found = find_stelliums(&edges, 8.0);
        assert!(found.is_empty());
    }
}
