use std::collections::{BTreeMap, BTreeSet};

use linetopo::{dissolve, Geometry, LineDissolver, Point, Polygon};
use proptest::prelude::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn lines_of(g: &Geometry) -> Vec<Vec<Point>> {
    match g {
        Geometry::LineString(l) => vec![l.clone()],
        Geometry::MultiLineString(ls) => ls.clone(),
        other => panic!("expected lines, got {other:?}"),
    }
}

/// The set of unique undirected segments in a geometry.
fn seg_set(g: &Geometry) -> BTreeSet<(Point, Point)> {
    let mut set = BTreeSet::new();
    let mut add = |pts: &[Point]| {
        for w in pts.windows(2) {
            if w[0] != w[1] {
                let (a, b) = if w[0] <= w[1] {
                    (w[0], w[1])
                } else {
                    (w[1], w[0])
                };
                set.insert((a, b));
            }
        }
    };
    g.for_each_line(&mut add);
    set
}

fn grid_lines() -> impl Strategy<Value = Vec<Vec<Point>>> {
    prop::collection::vec(prop::collection::vec((0i32..5, 0i32..5), 2..5), 1..10).prop_map(
        |lines| {
            lines
                .into_iter()
                .map(|l| {
                    l.into_iter()
                        .map(|(x, y)| pt(x as f64, y as f64))
                        .collect()
                })
                .collect()
        },
    )
}

#[test]
fn polygon_rings_dissolve_as_closed_lines() {
    let square = Geometry::Polygon(Polygon {
        exterior: vec![
            pt(0.0, 0.0),
            pt(1.0, 0.0),
            pt(1.0, 1.0),
            pt(0.0, 1.0),
            pt(0.0, 0.0),
        ],
        interiors: vec![],
    });
    assert_eq!(
        dissolve(&square),
        Geometry::LineString(vec![
            pt(0.0, 0.0),
            pt(1.0, 0.0),
            pt(1.0, 1.0),
            pt(0.0, 1.0),
            pt(0.0, 0.0),
        ])
    );
}

#[test]
fn incremental_adds_match_one_collection() {
    let a = Geometry::LineString(vec![pt(0.0, 0.0), pt(0.0, 10.0)]);
    let b = Geometry::LineString(vec![pt(0.0, 10.0), pt(10.0, 10.0)]);

    let mut dissolver = LineDissolver::new();
    dissolver.add(&a);
    dissolver.add(&b);
    assert_eq!(
        dissolver.result(),
        dissolve(&Geometry::Collection(vec![a, b]))
    );
}

proptest! {
    #[test]
    fn dissolve_conserves_segments(lines in grid_lines()) {
        let input = Geometry::MultiLineString(lines);
        let output = dissolve(&input);
        prop_assert_eq!(seg_set(&input), seg_set(&output));
    }

    #[test]
    fn dissolve_is_input_order_independent(lines in grid_lines(), rot in 0usize..10) {
        let baseline = dissolve(&Geometry::MultiLineString(lines.clone()));

        let mut rotated = lines.clone();
        let r = rot % rotated.len();
        rotated.rotate_left(r);
        prop_assert_eq!(&dissolve(&Geometry::MultiLineString(rotated)), &baseline);

        let mut reversed = lines;
        reversed.reverse();
        prop_assert_eq!(&dissolve(&Geometry::MultiLineString(reversed)), &baseline);
    }

    #[test]
    fn dissolve_breaks_only_at_nodes(lines in grid_lines()) {
        let input = Geometry::MultiLineString(lines);
        let mut degree: BTreeMap<Point, usize> = BTreeMap::new();
        for (a, b) in seg_set(&input) {
            *degree.entry(a).or_default() += 1;
            *degree.entry(b).or_default() += 1;
        }

        for line in lines_of(&dissolve(&input)) {
            // Interior vertices of a merged line must be pass-through
            // points of the whole input graph; anything else should have
            // ended the line.
            for p in &line[1..line.len() - 1] {
                prop_assert_eq!(degree[p], 2);
            }
        }
    }

    #[test]
    fn dissolved_output_has_no_duplicate_segments(lines in grid_lines()) {
        let output = dissolve(&Geometry::MultiLineString(lines));
        let mut seen = BTreeSet::new();
        for line in lines_of(&output) {
            for w in line.windows(2) {
                let (a, b) = if w[0] <= w[1] { (w[0], w[1]) } else { (w[1], w[0]) };
                prop_assert!(seen.insert((a, b)), "segment {:?}-{:?} emitted twice", a, b);
            }
        }
    }
}
