//! Directional shadow (emboss) kernels.
//!
//! Each of the eight compass directions has a fixed 3x3 kernel whose
//! weights sum to 1, so flat areas keep their value while edges facing the
//! light source are brightened and the opposite edges darkened.
//!
//! The kernel table is a static array indexed by [`ShadowDirection`]; names
//! resolve through [`FromStr`].
//!
//! # Example
//!
//! ```rust
//! use ij_core::{ArrayDataset, DataType, Dataset};
//! use ij_ops::engine::Scope;
//! use ij_ops::shadows::{shadow, ShadowDirection};
//!
//! let mut ds = ArrayDataset::from_fn(&[4, 4], DataType::U8, |_| 50.0).unwrap();
//! let dir: ShadowDirection = "south".parse().unwrap();
//! shadow(&mut ds, dir, &Scope::all()).unwrap();
//! assert_eq!(ds.get(&[2, 2]), 50.0);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use ij_core::Dataset;
use tracing::{debug, trace};

use crate::convolve::{convolve3x3, Kernel3x3};
use crate::engine::{Scope, TransformStats};
use crate::{OpsError, OpsResult};

/// Light direction of a shadow kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShadowDirection {
    /// Light from the top.
    North,
    /// Light from the top right.
    Northeast,
    /// Light from the right.
    East,
    /// Light from the bottom right.
    Southeast,
    /// Light from the bottom.
    South,
    /// Light from the bottom left.
    Southwest,
    /// Light from the left.
    West,
    /// Light from the top left.
    Northwest,
}

#[rustfmt::skip]
static SHADOW_KERNELS: [Kernel3x3; 8] = [
    // north
    Kernel3x3::new([ 1.0,  2.0,  1.0,   0.0, 1.0,  0.0,  -1.0, -2.0, -1.0]),
    // northeast
    Kernel3x3::new([ 0.0,  1.0,  2.0,  -1.0, 1.0,  1.0,  -2.0, -1.0,  0.0]),
    // east
    Kernel3x3::new([-1.0,  0.0,  1.0,  -2.0, 1.0,  2.0,  -1.0,  0.0,  1.0]),
    // southeast
    Kernel3x3::new([-2.0, -1.0,  0.0,  -1.0, 1.0,  1.0,   0.0,  1.0,  2.0]),
    // south
    Kernel3x3::new([-1.0, -2.0, -1.0,   0.0, 1.0,  0.0,   1.0,  2.0,  1.0]),
    // southwest
    Kernel3x3::new([ 0.0, -1.0, -2.0,   1.0, 1.0, -1.0,   2.0,  1.0,  0.0]),
    // west
    Kernel3x3::new([ 1.0,  0.0, -1.0,   2.0, 1.0, -2.0,   1.0,  0.0, -1.0]),
    // northwest
    Kernel3x3::new([ 2.0,  1.0,  0.0,   1.0, 1.0, -1.0,   0.0, -1.0, -2.0]),
];

impl ShadowDirection {
    /// All directions, clockwise from north.
    pub const ALL: [ShadowDirection; 8] = [
        Self::North,
        Self::Northeast,
        Self::East,
        Self::Southeast,
        Self::South,
        Self::Southwest,
        Self::West,
        Self::Northwest,
    ];

    /// The direction's kernel.
    pub fn kernel(self) -> &'static Kernel3x3 {
        &SHADOW_KERNELS[self as usize]
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::Northeast => "northeast",
            Self::East => "east",
            Self::Southeast => "southeast",
            Self::South => "south",
            Self::Southwest => "southwest",
            Self::West => "west",
            Self::Northwest => "northwest",
        }
    }

    /// Next direction clockwise.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ShadowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ShadowDirection {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let canonical = match lower.as_str() {
            "n" => "north",
            "ne" => "northeast",
            "e" => "east",
            "se" => "southeast",
            "s" => "south",
            "sw" => "southwest",
            "w" => "west",
            "nw" => "northwest",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|d| d.name() == canonical)
            .ok_or_else(|| OpsError::InvalidParameter(format!("unknown shadow direction '{s}'")))
    }
}

/// Applies the shadow kernel for `direction` in place.
pub fn shadow<D>(
    dataset: &mut D,
    direction: ShadowDirection,
    scope: &Scope,
) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
{
    debug!(direction = direction.name(), "shadow");
    convolve3x3(dataset, direction.kernel(), scope)
}

/// Cycles the shadow directions over `dataset`.
///
/// Each frame starts from the pristine contents, applies the next
/// direction and hands the result to `on_frame`. `stop` is polled between
/// frames only; a frame in progress always completes. The loop also ends
/// after `max_frames` frames when given. The original contents are restored
/// before returning.
///
/// Returns the number of frames shown.
///
/// ```rust
/// use std::sync::atomic::AtomicBool;
/// use ij_core::{ArrayDataset, DataType};
/// use ij_ops::engine::Scope;
/// use ij_ops::shadows::shadows_demo;
///
/// let mut ds = ArrayDataset::from_fn(&[16, 16], DataType::U8, |p| (p[0] * 16) as f64).unwrap();
/// let original = ds.clone();
/// let stop = AtomicBool::new(false);
/// let mut seen = Vec::new();
///
/// let frames =
///     shadows_demo(&mut ds, &Scope::all(), &stop, Some(10), |dir, _| seen.push(dir)).unwrap();
/// assert_eq!(frames, 10);
/// assert_eq!(seen[8], seen[0]);
/// assert_eq!(ds, original);
/// ```
pub fn shadows_demo<D, F>(
    dataset: &mut D,
    scope: &Scope,
    stop: &AtomicBool,
    max_frames: Option<usize>,
    mut on_frame: F,
) -> OpsResult<usize>
where
    D: Dataset,
    F: FnMut(ShadowDirection, &D),
{
    scope.resolve(dataset.dims())?;
    let pristine = dataset.duplicate();
    let mut direction = ShadowDirection::North;
    let mut frames = 0;
    debug!(?max_frames, "shadows demo: start");

    let result = loop {
        if stop.load(Ordering::Relaxed) {
            debug!(frames, "shadows demo: stop requested");
            break Ok(frames);
        }
        if max_frames.is_some_and(|max| frames >= max) {
            break Ok(frames);
        }
        if let Err(e) = dataset.copy_from(&pristine) {
            break Err(e.into());
        }
        if let Err(e) = shadow(dataset, direction, scope) {
            break Err(e);
        }
        trace!(frame = frames, direction = direction.name(), "shadows demo: frame");
        on_frame(direction, dataset);
        frames += 1;
        direction = direction.next();
    };

    dataset.copy_from(&pristine)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ij_core::{ArrayDataset, DataType};

    #[test]
    fn test_kernels_sum_to_one() {
        for dir in ShadowDirection::ALL {
            assert_eq!(dir.kernel().sum(), 1.0, "{dir}");
        }
    }

    #[test]
    fn test_opposites_are_negated() {
        for dir in ShadowDirection::ALL {
            let opposite = ShadowDirection::ALL[(dir as usize + 4) % 8];
            let a = dir.kernel().weights();
            let b = opposite.kernel().weights();
            for i in 0..9 {
                if i == 4 {
                    assert_eq!(a[i], b[i]);
                } else {
                    assert_eq!(a[i], -b[i], "{dir} vs {opposite}");
                }
            }
        }
    }

    #[test]
    fn test_table_matches_names() {
        assert_eq!(
            ShadowDirection::North.kernel().weights(),
            &[1.0, 2.0, 1.0, 0.0, 1.0, 0.0, -1.0, -2.0, -1.0]
        );
        assert_eq!(
            ShadowDirection::West.kernel().weights(),
            &[1.0, 0.0, -1.0, 2.0, 1.0, -2.0, 1.0, 0.0, -1.0]
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("South".parse::<ShadowDirection>().unwrap(), ShadowDirection::South);
        assert_eq!("nw".parse::<ShadowDirection>().unwrap(), ShadowDirection::Northwest);
        assert!("up".parse::<ShadowDirection>().is_err());
        for dir in ShadowDirection::ALL {
            assert_eq!(dir.to_string().parse::<ShadowDirection>().unwrap(), dir);
        }
    }

    #[test]
    fn test_south_shadow_on_step() {
        // Top half 0, bottom half 100: the step faces south light.
        let mut ds = ArrayDataset::from_fn(&[3, 4], DataType::I16, |p| {
            if p[1] >= 2 { 100.0 } else { 0.0 }
        })
        .unwrap();
        shadow(&mut ds, ShadowDirection::South, &Scope::all()).unwrap();
        // Row 1 sees the bright row below: 4 * 100.
        assert_eq!(ds.get(&[1, 1]), 400.0);
        // Row 2: dark row above adds nothing, centre plus 4 * 100 below.
        assert_eq!(ds.get(&[1, 2]), 500.0);
        // Last row: the missing row below takes the centre value.
        assert_eq!(ds.get(&[1, 3]), 100.0);
        assert_eq!(ds.get(&[1, 0]), 0.0);
    }

    #[test]
    fn test_demo_stops_on_flag() {
        let mut ds =
            ArrayDataset::from_fn(&[5, 5], DataType::U8, |p| (p[0] * p[1]) as f64).unwrap();
        let original = ds.clone();
        let stop = AtomicBool::new(false);
        let mut dirs = Vec::new();
        let frames = shadows_demo(&mut ds, &Scope::all(), &stop, None, |dir, _| {
            dirs.push(dir);
            if dirs.len() == 3 {
                stop.store(true, Ordering::Relaxed);
            }
        })
        .unwrap();
        assert_eq!(frames, 3);
        assert_eq!(dirs, ShadowDirection::ALL[..3].to_vec());
        assert_eq!(ds, original);
    }

    #[test]
    fn test_demo_frames_start_from_pristine() {
        let mut ds = ArrayDataset::from_fn(&[4, 4], DataType::F32, |p| p[0] as f64).unwrap();
        let mut expected = ds.clone();
        shadow(&mut expected, ShadowDirection::East, &Scope::all()).unwrap();
        let stop = AtomicBool::new(false);
        let mut third = None;
        shadows_demo(&mut ds, &Scope::all(), &stop, Some(3), |dir, frame| {
            if dir == ShadowDirection::East {
                third = Some(frame.clone());
            }
        })
        .unwrap();
        assert_eq!(third, Some(expected));
    }

    #[test]
    fn test_demo_rejects_bad_scope() {
        let mut ds = ArrayDataset::new(&[4, 4], DataType::U8).unwrap();
        let stop = AtomicBool::new(false);
        let scope = Scope::all().with_plane(vec![0]);
        let err = shadows_demo(&mut ds, &scope, &stop, Some(1), |_, _| {}).unwrap_err();
        assert!(err.is_bounds_error());
    }
}
