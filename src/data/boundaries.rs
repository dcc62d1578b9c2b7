use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use geojson::{Feature, GeoJson, Value};

use super::normalize::canonical_state;

/// Vertices closer than this (degrees) to the previous kept vertex are
/// dropped at load. Keeps triangulation and drawing cheap at dashboard zoom.
const SIMPLIFY_TOLERANCE_DEG: f64 = 0.01;

/// `[lon, lat]`
pub type Point = [f64; 2];

// ---------------------------------------------------------------------------
// Geometry primitives
// ---------------------------------------------------------------------------

/// Axis-aligned lon/lat box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    fn of_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc, &[lon, lat]| {
            Some(match acc {
                None => Bounds {
                    min_lon: lon,
                    min_lat: lat,
                    max_lon: lon,
                    max_lat: lat,
                },
                Some(b) => b.union(&Bounds {
                    min_lon: lon,
                    min_lat: lat,
                    max_lon: lon,
                    max_lat: lat,
                }),
            })
        })
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

/// One polygon: an outer ring, optional holes, and a fill triangulation of
/// the outer ring. Holes are outlined but not cut from the fill.
#[derive(Debug, Clone)]
pub struct Polygon {
    pub exterior: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
    /// Index triples into `exterior`.
    pub triangles: Vec<[usize; 3]>,
}

impl Polygon {
    fn new(exterior: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        let triangles = triangulate(&exterior);
        Self {
            exterior,
            holes,
            triangles,
        }
    }

    /// Even-odd test over all rings.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let mut inside = ring_contains(&self.exterior, lon, lat);
        for hole in &self.holes {
            if ring_contains(hole, lon, lat) {
                inside = !inside;
            }
        }
        inside
    }

    pub fn rings(&self) -> impl Iterator<Item = &Vec<Point>> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }
}

/// Ray-casting point-in-ring.
pub fn ring_contains(ring: &[Point], lon: f64, lat: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Twice the signed area; positive for counter-clockwise rings.
fn signed_area2(ring: &[Point]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let [x0, y0] = ring[i];
            let [x1, y1] = ring[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum()
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Inside or on the edge of the counter-clockwise triangle `abc`, corners excluded.
fn in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    if p == a || p == b || p == c {
        return false;
    }
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Ear-clipping triangulation of a simple ring (open or closed).
///
/// Returns index triples into `ring`. Self-intersecting input is fanned once
/// no further ear can be found.
pub fn triangulate(ring: &[Point]) -> Vec<[usize; 3]> {
    let mut n = ring.len();
    if n > 1 && ring[0] == ring[n - 1] {
        n -= 1;
    }
    if n < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    if signed_area2(&ring[..n]) < 0.0 {
        remaining.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    let mut i = 0;
    let mut misses = 0;

    while remaining.len() > 3 {
        let m = remaining.len();
        let prev = remaining[(i + m - 1) % m];
        let cur = remaining[i % m];
        let next = remaining[(i + 1) % m];
        let (a, b, c) = (ring[prev], ring[cur], ring[next]);

        let turn = cross(a, b, c);
        if turn == 0.0 {
            // Collinear or spike: drop the vertex, it adds no area.
            remaining.remove(i % m);
            i %= remaining.len();
            misses = 0;
            continue;
        }

        let is_ear = turn > 0.0
            && remaining
                .iter()
                .filter(|&&k| k != prev && k != cur && k != next)
                .all(|&k| !in_triangle(ring[k], a, b, c));

        if is_ear {
            triangles.push([prev, cur, next]);
            remaining.remove(i % m);
            i %= remaining.len();
            misses = 0;
        } else {
            i = (i + 1) % m;
            misses += 1;
            if misses > m {
                // No ear left: degenerate ring, fan what remains.
                for w in 1..remaining.len() - 1 {
                    triangles.push([remaining[0], remaining[w], remaining[w + 1]]);
                }
                return triangles;
            }
        }
    }
    if let [a, b, c] = remaining[..] {
        if cross(ring[a], ring[b], ring[c]) != 0.0 {
            triangles.push([a, b, c]);
        }
    }
    triangles
}

/// Drop vertices within `tolerance` of the last kept one, keeping the ring closed.
fn simplify(ring: &[Vec<f64>], tolerance: f64) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(ring.len());
    for pos in ring {
        if pos.len() < 2 {
            continue;
        }
        let p = [pos[0], pos[1]];
        match out.last() {
            Some(last)
                if (last[0] - p[0]).abs() < tolerance && (last[1] - p[1]).abs() < tolerance => {}
            _ => out.push(p),
        }
    }
    if out.len() >= 3 && out.first() != out.last() {
        if let Some(&first) = out.first() {
            out.push(first);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// State shapes
// ---------------------------------------------------------------------------

/// Boundary of one state, possibly several islands.
#[derive(Debug, Clone)]
pub struct StateShape {
    /// Name as spelled in the boundary file.
    pub name: String,
    pub canonical: String,
    pub polygons: Vec<Polygon>,
    pub bounds: Bounds,
}

impl StateShape {
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.bounds.contains(lon, lat) && self.polygons.iter().any(|p| p.contains(lon, lat))
    }
}

/// All state shapes of the boundary file.
#[derive(Debug, Clone, Default)]
pub struct StateBoundaries {
    pub shapes: Vec<StateShape>,
}

impl StateBoundaries {
    /// Overall extent, `None` when empty.
    pub fn bounds(&self) -> Option<Bounds> {
        self.shapes
            .iter()
            .map(|s| s.bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Topmost shape under a point.
    pub fn shape_at(&self, lon: f64, lat: f64) -> Option<&StateShape> {
        self.shapes.iter().rev().find(|s| s.contains(lon, lat))
    }

    pub fn find(&self, name: &str) -> Option<&StateShape> {
        let wanted = canonical_state(name);
        self.shapes.iter().find(|s| s.canonical == wanted)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// GeoJSON loading
// ---------------------------------------------------------------------------

/// Load state boundaries from a GeoJSON FeatureCollection file.
pub fn load_file(path: &Path, name_key: &str) -> Result<StateBoundaries> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading boundary file {}", path.display()))?;
    parse(&content, name_key).with_context(|| format!("parsing {}", path.display()))
}

/// Parse boundaries from GeoJSON text; each feature's name comes from the
/// `name_key` property.
pub fn parse(content: &str, name_key: &str) -> Result<StateBoundaries> {
    let geojson: GeoJson = content.parse()?;
    let GeoJson::FeatureCollection(fc) = geojson else {
        bail!("expected a GeoJSON FeatureCollection");
    };

    let mut shapes = Vec::with_capacity(fc.features.len());
    for (i, feature) in fc.features.iter().enumerate() {
        match shape_from_feature(feature, name_key) {
            Some(shape) => shapes.push(shape),
            None => {
                log::warn!("skipping boundary feature {i}: no '{name_key}' or no polygon geometry")
            }
        }
    }
    Ok(StateBoundaries { shapes })
}

fn shape_from_feature(feature: &Feature, name_key: &str) -> Option<StateShape> {
    let name = feature.property(name_key)?.as_str()?.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let polygon_rings: Vec<&Vec<Vec<Vec<f64>>>> = match &feature.geometry.as_ref()?.value {
        Value::Polygon(rings) => vec![rings],
        Value::MultiPolygon(polys) => polys.iter().collect(),
        _ => return None,
    };

    let polygons: Vec<Polygon> = polygon_rings
        .into_iter()
        .filter_map(|rings| {
            let mut rings = rings.iter().map(|r| simplify(r, SIMPLIFY_TOLERANCE_DEG));
            let exterior = rings.next().filter(|r| r.len() >= 4)?;
            let holes = rings.filter(|r| r.len() >= 4).collect();
            Some(Polygon::new(exterior, holes))
        })
        .collect();

    let bounds = Bounds::of_points(polygons.iter().flat_map(|p| p.exterior.iter()))?;
    Some(StateShape {
        canonical: canonical_state(&name),
        name,
        polygons,
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_of(ring: &[Point], triangles: &[[usize; 3]]) -> f64 {
        triangles
            .iter()
            .map(|&[a, b, c]| cross(ring[a], ring[b], ring[c]).abs() / 2.0)
            .sum()
    }

    #[test]
    fn test_triangulate_concave_ring() {
        // An "L" shape, clockwise and closed; area 3.
        let ring = vec![
            [0.0, 0.0],
            [0.0, 2.0],
            [1.0, 2.0],
            [1.0, 1.0],
            [2.0, 1.0],
            [2.0, 0.0],
            [0.0, 0.0],
        ];
        let tris = triangulate(&ring);
        assert_eq!(tris.len(), 4);
        assert!((area_of(&ring, &tris) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_triangulate_degenerate() {
        assert!(triangulate(&[[0.0, 0.0], [1.0, 1.0]]).is_empty());
        let line = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        assert!(triangulate(&line).is_empty());
    }

    #[test]
    fn test_triangulate_straight_borders_keep_notch_empty() {
        // A "U" whose edges run along grid lines, with a vertex at every unit step.
        let ring = vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [2.0, 0.0],
            [3.0, 0.0],
            [3.0, 1.0],
            [3.0, 2.0],
            [3.0, 3.0],
            [2.0, 3.0],
            [2.0, 2.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [1.0, 3.0],
            [0.0, 3.0],
            [0.0, 2.0],
            [0.0, 1.0],
            [0.0, 0.0],
        ];
        let reversed: Vec<Point> = ring.iter().rev().copied().collect();

        for ring in [ring, reversed] {
            let tris = triangulate(&ring);
            assert!((area_of(&ring, &tris) - 7.0).abs() < 1e-9);
            // The notch between the arms stays unfilled.
            let notch = [1.5, 2.5];
            assert!(!tris.iter().any(|&[a, b, c]| {
                let (a, b, c) = (ring[a], ring[b], ring[c]);
                let d = [cross(a, b, notch), cross(b, c, notch), cross(c, a, notch)];
                d.iter().all(|&v| v >= 0.0) || d.iter().all(|&v| v <= 0.0)
            }));
        }
    }

    #[test]
    fn test_polygon_with_hole() {
        let outer = vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]];
        let hole = vec![[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0], [1.0, 1.0]];
        let poly = Polygon::new(outer, vec![hole]);
        assert!(poly.contains(0.5, 0.5));
        assert!(!poly.contains(2.0, 2.0));
        assert!(!poly.contains(5.0, 2.0));
    }

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "Name": "Odisha" },
                "geometry": { "type": "Polygon", "coordinates": [[[84,18],[87,18],[87,22],[84,22],[84,18]]] }
            },
            {
                "type": "Feature",
                "properties": { "Name": "Andaman & Nicobar" },
                "geometry": { "type": "MultiPolygon", "coordinates": [
                    [[[92,11],[93,11],[93,12],[92,12],[92,11]]],
                    [[[93,7],[94,7],[94,8],[93,8],[93,7]]]
                ] }
            },
            {
                "type": "Feature",
                "properties": { "label": "unnamed" },
                "geometry": { "type": "Point", "coordinates": [80, 20] }
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let b = parse(SAMPLE, "Name").unwrap();
        assert_eq!(b.len(), 2);

        let odisha = b.find("orissa").unwrap();
        assert_eq!(odisha.name, "Odisha");
        assert_eq!(odisha.polygons[0].triangles.len(), 2);

        let islands = b.find("Andaman and Nicobar Islands").unwrap();
        assert_eq!(islands.polygons.len(), 2);

        let all = b.bounds().unwrap();
        assert_eq!((all.min_lon, all.max_lon), (84.0, 94.0));
        assert_eq!((all.min_lat, all.max_lat), (7.0, 22.0));
    }

    #[test]
    fn test_hit_testing() {
        let b = parse(SAMPLE, "Name").unwrap();
        assert_eq!(b.shape_at(85.0, 20.0).map(|s| s.canonical.as_str()), Some("orissa"));
        assert_eq!(
            b.shape_at(93.5, 7.5).map(|s| s.canonical.as_str()),
            Some("andaman and nicobar islands")
        );
        assert!(b.shape_at(70.0, 20.0).is_none());
    }

    #[test]
    fn test_rejects_non_collection() {
        let point = r#"{ "type": "Point", "coordinates": [80, 20] }"#;
        assert!(parse(point, "Name").is_err());
        assert!(parse("not json", "Name").is_err());
    }

    #[test]
    fn test_simplify_drops_close_vertices() {
        let ring = vec![
            vec![0.0, 0.0],
            vec![0.001, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ];
        let simplified = simplify(&ring, 0.01);
        assert_eq!(simplified, vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    }
}
