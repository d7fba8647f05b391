//! A tagged union over the geometry kinds this crate consumes and produces.
//!
//! This is deliberately not a full geometry type hierarchy: the only
//! contract the topology algorithms need is "give me your linear components
//! as coordinate slices", plus a factory for packaging result lines back
//! up. Parsing, serialization formats and coordinate reference systems all
//! live elsewhere.

use kurbo::Rect;

use crate::geom::Point;

/// A polygon: one exterior ring and any number of interior rings (holes).
///
/// Rings are stored as closed coordinate sequences (first point equal to the
/// last); this module doesn't validate that, since it only ever reads rings
/// as plain lines.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polygon {
    /// The outer boundary.
    pub exterior: Vec<Point>,
    /// The holes, if any.
    pub interiors: Vec<Vec<Point>>,
}

/// A 2D geometry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Geometry {
    /// A single point.
    Point(Point),
    /// A set of points.
    MultiPoint(Vec<Point>),
    /// A polyline.
    LineString(Vec<Point>),
    /// A set of polylines.
    MultiLineString(Vec<Vec<Point>>),
    /// A single polygon.
    Polygon(Polygon),
    /// A set of polygons.
    MultiPolygon(Vec<Polygon>),
    /// A heterogeneous collection.
    Collection(Vec<Geometry>),
}

impl Geometry {
    /// Visits every linear component depth-first: line strings, the lines of
    /// multi-line strings, and polygon rings. Points contribute nothing.
    pub fn for_each_line<'a, F: FnMut(&'a [Point])>(&'a self, f: &mut F) {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => {}
            Geometry::LineString(pts) => f(pts),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    f(line);
                }
            }
            Geometry::Polygon(p) => {
                f(&p.exterior);
                for ring in &p.interiors {
                    f(ring);
                }
            }
            Geometry::MultiPolygon(ps) => {
                for p in ps {
                    f(&p.exterior);
                    for ring in &p.interiors {
                        f(ring);
                    }
                }
            }
            Geometry::Collection(gs) => {
                for g in gs {
                    g.for_each_line(f);
                }
            }
        }
    }

    /// Packages a batch of result lines as a geometry: a lone line becomes a
    /// [`Geometry::LineString`], anything else (including the empty batch) a
    /// [`Geometry::MultiLineString`].
    pub fn from_lines(mut lines: Vec<Vec<Point>>) -> Geometry {
        if lines.len() == 1 {
            Geometry::LineString(lines.remove(0))
        } else {
            Geometry::MultiLineString(lines)
        }
    }

    /// The axis-aligned bounding rectangle, or `None` if this geometry has
    /// no coordinates at all.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let mut rect = None;
        self.extend_rect(&mut rect);
        rect
    }

    fn extend_rect(&self, rect: &mut Option<Rect>) {
        fn add_points(rect: &mut Option<Rect>, pts: &[Point]) {
            for p in pts {
                let k = p.to_kurbo();
                *rect = Some(match rect {
                    None => Rect::from_points(k, k),
                    Some(r) => r.union_pt(k),
                });
            }
        }

        match self {
            Geometry::Point(p) => add_points(rect, std::slice::from_ref(p)),
            Geometry::MultiPoint(pts) => add_points(rect, pts),
            Geometry::LineString(pts) => add_points(rect, pts),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    add_points(rect, line);
                }
            }
            Geometry::Polygon(p) => {
                add_points(rect, &p.exterior);
                for ring in &p.interiors {
                    add_points(rect, ring);
                }
            }
            Geometry::MultiPolygon(ps) => {
                for p in ps {
                    add_points(rect, &p.exterior);
                    for ring in &p.interiors {
                        add_points(rect, ring);
                    }
                }
            }
            Geometry::Collection(gs) => {
                for g in gs {
                    g.extend_rect(rect);
                }
            }
        }
    }

    /// Does this geometry contain no coordinates?
    pub fn is_empty(&self) -> bool {
        self.bounding_rect().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn for_each_line_visits_rings() {
        let g = Geometry::Collection(vec![
            Geometry::Point(pt(9.0, 9.0)),
            Geometry::LineString(vec![pt(0.0, 0.0), pt(1.0, 0.0)]),
            Geometry::Polygon(Polygon {
                exterior: vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(0.0, 1.0), pt(0.0, 0.0)],
                interiors: vec![],
            }),
        ]);
        let mut lines = 0;
        g.for_each_line(&mut |_| lines += 1);
        assert_eq!(lines, 2);
    }

    #[test]
    fn from_lines_picks_collection_type() {
        assert_eq!(
            Geometry::from_lines(vec![]),
            Geometry::MultiLineString(vec![])
        );
        assert_eq!(
            Geometry::from_lines(vec![vec![pt(0.0, 0.0), pt(1.0, 0.0)]]),
            Geometry::LineString(vec![pt(0.0, 0.0), pt(1.0, 0.0)])
        );
    }

    #[test]
    fn bounding_rect_covers_all_parts() {
        let g = Geometry::Collection(vec![
            Geometry::Point(pt(-1.0, 2.0)),
            Geometry::LineString(vec![pt(0.0, 0.0), pt(3.0, 1.0)]),
        ]);
        let r = g.bounding_rect().unwrap();
        assert_eq!((r.min_x(), r.min_y(), r.max_x(), r.max_y()), (-1.0, 0.0, 3.0, 2.0));

        assert!(Geometry::MultiLineString(vec![]).is_empty());
    }
}
