//! Pointy-top axial hex grid math.
//!
//! Every function here is pure. The only state is the hex radius carried by
//! [`HexLayout`], which scales conversions between axial coordinates and
//! world-space pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

const SQRT_3: f32 = 1.732_050_8;

/// Axial offsets of the six neighbors, counter-clockwise starting east.
pub const DIRECTIONS: [HexCoord; 6] = [
    HexCoord::new(1, 0),
    HexCoord::new(1, -1),
    HexCoord::new(0, -1),
    HexCoord::new(-1, 0),
    HexCoord::new(-1, 1),
    HexCoord::new(0, 1),
];

/// Axial coordinate addressing a single hex.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct HexCoord {
    q: i32,
    r: i32,
}

impl HexCoord {
    /// Hex at the center of the grid.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new axial coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column component of the axial coordinate.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Row component of the axial coordinate.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Implicit third cube component, chosen so that `q + r + s == 0`.
    #[must_use]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Returns the coordinate translated by `other`.
    #[must_use]
    pub const fn offset(self, other: HexCoord) -> Self {
        Self::new(self.q + other.q, self.r + other.r)
    }

    /// Neighbor in the given direction index, wrapping modulo six.
    #[must_use]
    pub const fn neighbor(self, direction: usize) -> Self {
        self.offset(DIRECTIONS[direction % DIRECTIONS.len()])
    }

    /// All six neighbors in [`DIRECTIONS`] order.
    #[must_use]
    pub fn neighbors(self) -> [HexCoord; 6] {
        DIRECTIONS.map(|direction| self.offset(direction))
    }

    /// Number of hex steps between two coordinates.
    ///
    /// Computed as the Chebyshev distance between the cube representations.
    #[must_use]
    pub fn distance(self, other: HexCoord) -> u32 {
        let dq = self.q.abs_diff(other.q);
        let dr = self.r.abs_diff(other.r);
        let ds = self.s().abs_diff(other.s());
        dq.max(dr).max(ds)
    }

    /// Every coordinate within `radius` steps, including `self`.
    ///
    /// Output is ordered by `q` then `r`.
    #[must_use]
    pub fn range(self, radius: u32) -> Vec<HexCoord> {
        let n = i32::try_from(radius).unwrap_or(i32::MAX / 2);
        let mut out = Vec::with_capacity(hex_count(radius));
        for dq in -n..=n {
            let low = (-n).max(-dq - n);
            let high = n.min(-dq + n);
            for dr in low..=high {
                out.push(self.offset(HexCoord::new(dq, dr)));
            }
        }
        out
    }

    /// Coordinates exactly `radius` steps away, walking the ring
    /// counter-clockwise from its south-west corner.
    #[must_use]
    pub fn ring(self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![self];
        }

        let steps = i32::try_from(radius).unwrap_or(i32::MAX / 2);
        let corner = DIRECTIONS[4];
        let mut cursor = self.offset(HexCoord::new(corner.q * steps, corner.r * steps));
        let mut out = Vec::with_capacity(6 * radius as usize);
        for direction in 0..DIRECTIONS.len() {
            for _ in 0..radius {
                out.push(cursor);
                cursor = cursor.neighbor(direction);
            }
        }
        out
    }
}

fn hex_count(radius: u32) -> usize {
    let r = radius as usize;
    1 + 3 * r * (r + 1)
}

/// Scale used to convert between axial coordinates and world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexLayout {
    radius: f32,
}

impl HexLayout {
    /// Creates a layout whose hexes measure `radius` from center to corner.
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Distance from a hex center to any of its corners.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Center of the hex in world space, relative to the grid origin.
    #[must_use]
    pub fn axial_to_pixel(&self, coord: HexCoord) -> Vec2 {
        let q = coord.q() as f32;
        let r = coord.r() as f32;
        Vec2::new(
            self.radius * (SQRT_3 * q + SQRT_3 / 2.0 * r),
            self.radius * (1.5 * r),
        )
    }

    /// Hex containing the provided world-space point.
    ///
    /// A degenerate layout with a non-positive radius maps every point to the
    /// origin.
    #[must_use]
    pub fn pixel_to_axial(&self, point: Vec2) -> HexCoord {
        if self.radius <= 0.0 {
            return HexCoord::ORIGIN;
        }
        let q = (SQRT_3 / 3.0 * point.x - point.y / 3.0) / self.radius;
        let r = (2.0 / 3.0 * point.y) / self.radius;
        round_axial(q, r)
    }
}

/// Rounds fractional axial coordinates to the nearest hex.
///
/// The cube component with the largest rounding error is recomputed from the
/// other two so the result stays on the `x + y + z = 0` plane.
#[must_use]
pub fn round_axial(q: f32, r: f32) -> HexCoord {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let q_error = (rq - q).abs();
    let r_error = (rr - r).abs();
    let s_error = (rs - s).abs();

    if q_error > r_error && q_error > s_error {
        rq = -rr - rs;
    } else if r_error > s_error {
        rr = -rq - rs;
    }

    HexCoord::new(rq as i32, rr as i32)
}
