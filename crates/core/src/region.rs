//! Region: a set of screen cells stored as horizontal bands of rectangles.
//!
//! A region is a list of non-overlapping bands sorted top to bottom. Each band
//! covers the rows `[top, bottom)` and holds a sorted list of walls; consecutive
//! wall pairs `[walls[0], walls[1])`, `[walls[2], walls[3])`, ... are the column
//! spans covered in that band.
//!
//! Every operation rebuilds the band list in canonical form:
//! - no empty bands,
//! - no two vertically adjacent bands with identical walls,
//! - no zero-width or touching spans inside a band.
//!
//! So two regions covering the same cells always compare equal.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Range, Sub, SubAssign};

use crate::types::{Point, Size};

/// A half-open rectangle `[top, bottom) x [left, right)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Rect {
    pub fn new(pos: Point, size: Size) -> Self {
        Self {
            top: pos.row,
            left: pos.col,
            bottom: pos.row + size.height as i32,
            right: pos.col + size.width as i32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top >= self.bottom || self.left >= self.right
    }

    pub fn rows(&self) -> Range<i32> {
        self.top..self.bottom
    }

    pub fn cols(&self) -> Range<i32> {
        self.left..self.right
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn contains(&self, p: Point) -> bool {
        self.top <= p.row && p.row < self.bottom && self.left <= p.col && p.col < self.right
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.top < other.bottom
            && other.top < self.bottom
            && self.left < other.right
            && other.left < self.right
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Band {
    top: i32,
    bottom: i32,
    walls: Vec<i32>,
}

/// A set of cells; see the module docs for the representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Region {
    bands: Vec<Band>,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Or,
    And,
    Sub,
}

impl Op {
    #[inline(always)]
    fn apply(self, a: bool, b: bool) -> bool {
        match self {
            Op::Or => a || b,
            Op::And => a && b,
            Op::Sub => a && !b,
        }
    }
}

impl Region {
    pub const EMPTY: Region = Region { bands: Vec::new() };

    /// The empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single rectangle; degenerate sizes give the empty region.
    pub fn from_rect(pos: Point, size: Size) -> Self {
        Self::from(Rect::new(pos, size))
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Number of rectangles in the decomposition.
    pub fn len(&self) -> usize {
        self.bands.iter().map(|b| b.walls.len() / 2).sum()
    }

    /// Number of cells covered.
    pub fn area(&self) -> usize {
        self.rects()
            .map(|r| (r.height() as usize) * (r.width() as usize))
            .sum()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bands
            .iter()
            .find(|b| b.top <= p.row && p.row < b.bottom)
            .map(|b| {
                b.walls
                    .chunks_exact(2)
                    .any(|span| span[0] <= p.col && p.col < span[1])
            })
            .unwrap_or(false)
    }

    /// Smallest rectangle containing the region, if any.
    pub fn bounds(&self) -> Option<Rect> {
        let first = self.bands.first()?;
        let last = self.bands.last()?;
        let mut left = i32::MAX;
        let mut right = i32::MIN;
        for band in &self.bands {
            left = left.min(band.walls[0]);
            right = right.max(band.walls[band.walls.len() - 1]);
        }
        Some(Rect {
            top: first.top,
            left,
            bottom: last.bottom,
            right,
        })
    }

    /// Component rectangles, top to bottom and left to right within a band.
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.bands.iter().flat_map(|band| {
            band.walls.chunks_exact(2).map(move |span| Rect {
                top: band.top,
                left: span[0],
                bottom: band.bottom,
                right: span[1],
            })
        })
    }

    pub fn clear(&mut self) {
        self.bands.clear();
    }

    fn push_band(&mut self, top: i32, bottom: i32, walls: Vec<i32>) {
        if walls.is_empty() || top >= bottom {
            return;
        }
        if let Some(last) = self.bands.last_mut() {
            if last.bottom == top && last.walls == walls {
                last.bottom = bottom;
                return;
            }
        }
        self.bands.push(Band { top, bottom, walls });
    }

    fn combine(a: &Region, b: &Region, op: Op) -> Region {
        // Fast paths keep the common compositor cases cheap.
        match op {
            Op::And if a.is_empty() || b.is_empty() => return Region::new(),
            Op::Sub if a.is_empty() => return Region::new(),
            Op::Sub if b.is_empty() => return a.clone(),
            Op::Or if a.is_empty() => return b.clone(),
            Op::Or if b.is_empty() => return a.clone(),
            _ => {}
        }

        let mut ys: Vec<i32> = Vec::with_capacity(2 * (a.bands.len() + b.bands.len()));
        for band in a.bands.iter().chain(b.bands.iter()) {
            ys.push(band.top);
            ys.push(band.bottom);
        }
        ys.sort_unstable();
        ys.dedup();

        let mut out = Region::new();
        let (mut ia, mut ib) = (0usize, 0usize);
        for w in ys.windows(2) {
            let (top, bottom) = (w[0], w[1]);
            while ia < a.bands.len() && a.bands[ia].bottom <= top {
                ia += 1;
            }
            while ib < b.bands.len() && b.bands[ib].bottom <= top {
                ib += 1;
            }
            let wa = band_walls_at(&a.bands, ia, top);
            let wb = band_walls_at(&b.bands, ib, top);
            if wa.is_empty() && wb.is_empty() {
                continue;
            }
            out.push_band(top, bottom, merge_walls(wa, wb, op));
        }
        out
    }
}

fn band_walls_at(bands: &[Band], idx: usize, top: i32) -> &[i32] {
    match bands.get(idx) {
        Some(band) if band.top <= top => &band.walls,
        _ => &[],
    }
}

/// Sweep two sorted wall lists, keeping spans where `op(in_a, in_b)` holds.
fn merge_walls(a: &[i32], b: &[i32], op: Op) -> Vec<i32> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0usize, 0usize);
    let (mut in_a, mut in_b, mut inside) = (false, false, false);

    while i < a.len() || j < b.len() {
        let x = match (a.get(i), b.get(j)) {
            (Some(&xa), Some(&xb)) => xa.min(xb),
            (Some(&xa), None) => xa,
            (None, Some(&xb)) => xb,
            (None, None) => break,
        };
        if a.get(i) == Some(&x) {
            in_a = !in_a;
            i += 1;
        }
        if b.get(j) == Some(&x) {
            in_b = !in_b;
            j += 1;
        }
        let now = op.apply(in_a, in_b);
        if now != inside {
            out.push(x);
            inside = now;
        }
    }
    out
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        let mut region = Region::new();
        if !rect.is_empty() {
            region.bands.push(Band {
                top: rect.top,
                bottom: rect.bottom,
                walls: vec![rect.left, rect.right],
            });
        }
        region
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Region::new(), |acc, rect| &acc | &Region::from(rect))
    }
}

impl BitAnd for &Region {
    type Output = Region;

    fn bitand(self, rhs: &Region) -> Region {
        Region::combine(self, rhs, Op::And)
    }
}

impl BitOr for &Region {
    type Output = Region;

    fn bitor(self, rhs: &Region) -> Region {
        Region::combine(self, rhs, Op::Or)
    }
}

impl Sub for &Region {
    type Output = Region;

    fn sub(self, rhs: &Region) -> Region {
        Region::combine(self, rhs, Op::Sub)
    }
}

impl BitAnd for Region {
    type Output = Region;

    fn bitand(self, rhs: Region) -> Region {
        &self & &rhs
    }
}

impl BitOr for Region {
    type Output = Region;

    fn bitor(self, rhs: Region) -> Region {
        &self | &rhs
    }
}

impl Sub for Region {
    type Output = Region;

    fn sub(self, rhs: Region) -> Region {
        &self - &rhs
    }
}

impl BitAndAssign<&Region> for Region {
    fn bitand_assign(&mut self, rhs: &Region) {
        *self = &*self & rhs;
    }
}

impl BitOrAssign<&Region> for Region {
    fn bitor_assign(&mut self, rhs: &Region) {
        *self = &*self | rhs;
    }
}

impl SubAssign<&Region> for Region {
    fn sub_assign(&mut self, rhs: &Region) {
        *self = &*self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(top: i32, left: i32, h: u16, w: u16) -> Region {
        Region::from_rect(Point::new(top, left), Size::new(h, w))
    }

    fn cells(r: &Region, grid: i32) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for row in -1..grid {
            for col in -1..grid {
                if r.contains(Point::new(row, col)) {
                    out.push((row, col));
                }
            }
        }
        out
    }

    #[test]
    fn degenerate_rect_is_empty() {
        assert!(rect(0, 0, 0, 5).is_empty());
        assert!(rect(3, 3, 4, 0).is_empty());
        assert!(!rect(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn subtract_center_fragments_into_four() {
        let outer = rect(0, 0, 5, 5);
        let hole = rect(1, 1, 3, 3);
        let ring = &outer - &hole;
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.area(), 25 - 9);
        assert!(!ring.contains(Point::new(2, 2)));
        assert!(ring.contains(Point::new(0, 0)));
    }

    #[test]
    fn union_coalesces_adjacent_rects() {
        let a = rect(0, 0, 2, 5);
        let b = rect(2, 0, 3, 5);
        let u = &a | &b;
        assert_eq!(u, rect(0, 0, 5, 5));
        assert_eq!(u.len(), 1);

        let side = &rect(0, 0, 4, 2) | &rect(0, 2, 4, 3);
        assert_eq!(side, rect(0, 0, 4, 5));
    }

    #[test]
    fn subtract_then_union_restores_canonical_form() {
        let a = rect(0, 0, 6, 6);
        let b = rect(2, 2, 2, 2);
        let restored = &(&a - &b) | &b;
        assert_eq!(restored, a);
        assert_eq!(restored.len(), 1);
    }

    #[test]
    fn intersection_of_disjoint_rects_is_empty() {
        let a = rect(0, 0, 2, 2);
        let b = rect(0, 2, 2, 2);
        assert!((&a & &b).is_empty());
        assert!(!(&a & &rect(1, 1, 2, 2)).is_empty());
    }

    #[test]
    fn membership_properties_hold_on_small_grid() {
        let shapes = [
            rect(0, 0, 4, 4),
            rect(2, 1, 5, 3),
            &rect(1, 1, 6, 6) - &rect(3, 3, 1, 1),
            &rect(0, 5, 2, 3) | &rect(5, 0, 3, 2),
            Region::new(),
        ];
        for a in &shapes {
            assert!((a - a).is_empty());
            for b in &shapes {
                assert!((&(a - b) & b).is_empty());
                assert_eq!(a & b, b & a);
                assert_eq!(a | b, b | a);

                let u = a | b;
                let i = a & b;
                for row in -1..9 {
                    for col in -1..9 {
                        let p = Point::new(row, col);
                        assert_eq!(u.contains(p), a.contains(p) || b.contains(p));
                        assert_eq!(i.contains(p), a.contains(p) && b.contains(p));
                    }
                }
                let overlaps = a.rects().any(|ra| b.rects().any(|rb| ra.intersects(&rb)));
                assert_eq!(i.is_empty(), !overlaps);
            }
        }
    }

    #[test]
    fn union_is_associative() {
        let a = rect(0, 0, 3, 3);
        let b = rect(1, 2, 3, 3);
        let c = rect(4, 0, 2, 8);
        assert_eq!(&(&a | &b) | &c, &a | &(&b | &c));
        assert_eq!(cells(&(&(&a | &b) | &c), 9), cells(&(&a | &(&b | &c)), 9));
    }

    #[test]
    fn repeated_subtract_union_does_not_fragment() {
        let full = rect(0, 0, 20, 40);
        let mut r = full.clone();
        for i in 0..50 {
            let hole = rect(i % 17, (i * 3) % 37, 3, 3);
            r -= &hole;
            r |= &hole;
        }
        assert_eq!(r, full);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn bounds_cover_all_rects() {
        let r = &rect(1, 4, 2, 2) | &rect(5, 0, 1, 3);
        assert_eq!(
            r.bounds(),
            Some(Rect {
                top: 1,
                left: 0,
                bottom: 6,
                right: 6
            })
        );
        assert_eq!(Region::new().bounds(), None);
    }
}
