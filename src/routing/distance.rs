//! Distance primitives between cells and between paths.

use crate::grid::Point;

/// Closest pair of cells between two paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closest {
    /// Manhattan distance between `a` and `b`.
    pub distance: u32,
    /// Cell taken from the first path.
    pub a: Point,
    /// Cell taken from the second path.
    pub b: Point,
}

/// Minimum Manhattan distance over the full cross product of two paths.
///
/// Cells of `a` are scanned in the outer loop and cells of `b` in the inner
/// one; the first pair reaching the minimum wins. Returns `None` if either
/// path is empty.
pub fn path_distance(a: &[Point], b: &[Point]) -> Option<Closest> {
    let mut best: Option<Closest> = None;
    for &pa in a {
        for &pb in b {
            let d = pa.manhattan(pb);
            if best.is_none_or(|c| d < c.distance) {
                best = Some(Closest {
                    distance: d,
                    a: pa,
                    b: pb,
                });
                if d == 0 {
                    return best;
                }
            }
        }
    }
    best
}

/// Smallest distance from `path` to any of `others`.
///
/// `None` when `others` is empty.
pub fn min_distance_to_any<'a, I>(path: &[Point], others: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a [Point]>,
{
    others
        .into_iter()
        .filter_map(|other| path_distance(path, other))
        .map(|c| c.distance)
        .min()
}
