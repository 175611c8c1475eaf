//! Integration tests for the ij crates.
//!
//! End-to-end checks of the engine guarantees across `ij-core` and
//! `ij-ops`: region rejection, exactly-once visitation, clamping, rotation
//! round trips, preview restore and convolution edge handling.

#[cfg(test)]
mod tests {
    use ij_core::{ArrayDataset, Axis, DataType, Dataset, Region};
    use ij_ops::dataset_ops::{self, clamp_min, convert, rotate_left, rotate_right, sharpen};
    use ij_ops::engine::{self, apply_unary, blit, Scope};
    use ij_ops::{EngineConfig, Kernel3x3, PreviewSession, UnaryOp};

    /// Dataset that counts writes per sample.
    struct CountingDataset {
        inner: ArrayDataset,
        writes: Vec<u32>,
    }

    impl CountingDataset {
        fn new(dims: &[usize], data_type: DataType) -> Self {
            let inner = ArrayDataset::new(dims, data_type).unwrap();
            let writes = vec![0; inner.sample_count()];
            Self { inner, writes }
        }

        fn writes_at(&self, pos: &[usize]) -> u32 {
            self.writes[self.inner.index_of(pos)]
        }
    }

    impl Dataset for CountingDataset {
        fn dims(&self) -> &[usize] {
            self.inner.dims()
        }

        fn data_type(&self) -> DataType {
            self.inner.data_type()
        }

        fn axes(&self) -> &[Axis] {
            self.inner.axes()
        }

        fn get(&self, pos: &[usize]) -> f64 {
            self.inner.get(pos)
        }

        fn set(&mut self, pos: &[usize], value: f64) {
            let idx = self.inner.index_of(pos);
            self.writes[idx] += 1;
            self.inner.set(pos, value);
        }

        fn duplicate(&self) -> Self {
            Self {
                inner: self.inner.clone(),
                writes: vec![0; self.writes.len()],
            }
        }
    }

    fn parallel_always() -> EngineConfig {
        EngineConfig {
            parallel: true,
            min_parallel_samples: 0,
        }
    }

    fn configs() -> [EngineConfig; 2] {
        [EngineConfig::sequential(), parallel_always()]
    }

    fn ramp(dims: &[usize], t: DataType) -> ArrayDataset {
        ArrayDataset::from_fn(dims, t, |p| {
            p.iter().enumerate().map(|(i, &v)| ((i + 1) * 7 * v) as f64).sum::<f64>() % 200.0
        })
        .unwrap()
    }

    fn all_positions(dims: &[usize]) -> Vec<Vec<usize>> {
        ij_core::RegionIter::new(&Region::whole(dims)).collect()
    }

    // --- region validation ---

    #[test]
    fn test_out_of_bounds_region_leaves_dataset_untouched() {
        let original = ramp(&[10, 8, 2], DataType::U8);
        let bad = [
            Region::new(vec![5, 0, 0], vec![6, 8, 2]),
            Region::new(vec![0, 0, 0], vec![10, 8, 3]),
            Region::new(vec![0, 0], vec![10, 8]),
            Region::new(vec![0, 0, 0], vec![10, 0, 2]),
        ];
        for region in bad {
            let scope = Scope::region(region.clone());
            for cfg in configs() {
                let mut ds = original.clone();
                let err =
                    dataset_ops::apply(&mut ds, &UnaryOp::Fill(9.0), &scope, &cfg).unwrap_err();
                assert!(err.is_bounds_error(), "{region:?}: {err}");
                let err = dataset_ops::convolve(&mut ds, &Kernel3x3::SHARPEN, &scope, &cfg)
                    .unwrap_err();
                assert!(err.is_bounds_error());
                assert_eq!(ds, original);
            }
        }
    }

    #[test]
    fn test_blit_span_mismatch_leaves_dataset_untouched() {
        let original = ramp(&[6, 6], DataType::I16);
        let mut dst = original.clone();
        let src = ramp(&[6, 6], DataType::I16);
        let err = blit(
            &mut dst,
            &Region::rect(&[6, 6], 0, 0, 3, 3),
            &src,
            &Region::rect(&[6, 6], 0, 0, 3, 2),
            &ij_ops::BinaryOp::Add,
        )
        .unwrap_err();
        assert!(err.is_bounds_error());
        assert_eq!(dst, original);
    }

    // --- exactly-once visitation ---

    #[test]
    fn test_every_region_sample_written_once() {
        let dims = [9, 7, 3];
        let region = Region::new(vec![2, 1, 1], vec![5, 4, 2]);
        for cfg in configs() {
            let mut ds = CountingDataset::new(&dims, DataType::U16);
            let scope = Scope::region(region.clone());
            let stats = dataset_ops::apply(&mut ds, &UnaryOp::Add(1.0), &scope, &cfg).unwrap();
            assert_eq!(stats.visited, region.sample_count());
            for pos in all_positions(&dims) {
                let expected = u32::from(region.contains(&pos));
                assert_eq!(ds.writes_at(&pos), expected, "{pos:?}");
            }
        }
    }

    #[test]
    fn test_single_plane_written_once() {
        let dims = [5, 4, 3, 2];
        let mut ds = CountingDataset::new(&dims, DataType::F32);
        let scope = Scope::all().with_plane(vec![2, 1]);
        let stats = apply_unary(&mut ds, &UnaryOp::Fill(1.0), &scope).unwrap();
        assert_eq!(stats.visited, 20);
        assert_eq!(stats.lines, 4);
        for pos in all_positions(&dims) {
            let on_plane = pos[2] == 2 && pos[3] == 1;
            assert_eq!(ds.writes_at(&pos), u32::from(on_plane));
        }
    }

    #[test]
    fn test_convolution_writes_each_sample_once() {
        let dims = [12, 10, 2];
        let region = Region::new(vec![1, 2, 0], vec![10, 6, 2]);
        for cfg in configs() {
            let mut ds = CountingDataset::new(&dims, DataType::I32);
            let scope = Scope::region(region.clone());
            dataset_ops::convolve(&mut ds, &Kernel3x3::SHARPEN, &scope, &cfg).unwrap();
            for pos in all_positions(&dims) {
                assert_eq!(ds.writes_at(&pos), u32::from(region.contains(&pos)));
            }
        }
    }

    // --- clamping ---

    #[test]
    fn test_clamp_min_idempotent_for_every_type() {
        for t in DataType::ALL {
            let src = ArrayDataset::from_fn(&[16, 4], t, |p| p[0] as f64 * 9.5 - 40.0).unwrap();
            let mut once = src.clone();
            clamp_min(&mut once, 12.0, &Scope::all(), &EngineConfig::default()).unwrap();
            let mut twice = once.clone();
            clamp_min(&mut twice, 12.0, &Scope::all(), &EngineConfig::default()).unwrap();
            assert_eq!(once, twice, "{t}");
            assert!(once.to_f64_vec().iter().all(|&v| v >= 12.0), "{t}");
        }
    }

    #[test]
    fn test_bounded_integer_arithmetic() {
        let mut ds = ArrayDataset::from_fn(&[2, 2], DataType::U8, |_| 1.0).unwrap();
        apply_unary(&mut ds, &UnaryOp::Add(68.6), &Scope::all()).unwrap();
        assert_eq!(ds.get(&[0, 0]), 69.0);

        let mut ds = ArrayDataset::new(&[2, 2], DataType::I16).unwrap();
        apply_unary(&mut ds, &UnaryOp::Add(-13.4), &Scope::all()).unwrap();
        assert_eq!(ds.get(&[1, 1]), -13.0);

        let mut ds = ArrayDataset::from_fn(&[2, 1], DataType::U8, |p| [250.0, 3.0][p[0]]).unwrap();
        apply_unary(&mut ds, &UnaryOp::Add(10.0), &Scope::all()).unwrap();
        assert_eq!(ds.get(&[0, 0]), 255.0);
        apply_unary(&mut ds, &UnaryOp::Subtract(20.0), &Scope::all()).unwrap();
        assert_eq!(ds.get(&[1, 0]), 0.0);
    }

    // --- geometry ---

    #[test]
    fn test_rotation_round_trips() {
        for dims in [vec![7, 3], vec![4, 5, 2]] {
            let src = ramp(&dims, DataType::U16);
            let left = rotate_left(&src).unwrap();
            assert_eq!(rotate_right(&left).unwrap(), src);
            let right = rotate_right(&src).unwrap();
            assert_eq!(rotate_left(&right).unwrap(), src);

            let mut spun = src.clone();
            for _ in 0..4 {
                spun = rotate_left(&spun).unwrap();
            }
            assert_eq!(spun, src);
        }
    }

    // --- preview ---

    #[test]
    fn test_preview_round_trip_is_bit_identical() {
        let original = ramp(&[20, 15, 2], DataType::F32);
        let mut ds = original.clone();
        let scope = Scope::region(Region::new(vec![3, 3, 0], vec![10, 10, 2]));
        let cfg = parallel_always();
        {
            let mut session = PreviewSession::new(&mut ds);
            for gain in [0.5, 3.0, -1.0, 3.0] {
                let mut op = |d: &mut ArrayDataset| {
                    dataset_ops::apply(d, &UnaryOp::Multiply(gain), &scope, &cfg)?;
                    dataset_ops::sharpen(d, &scope, &cfg).map(|_| ())
                };
                session.apply_preview(&mut op, true).unwrap();
            }
            assert_ne!(session.dataset(), &original);
            assert_eq!(session.backup(), Some(&original));
            session.toggle_off().unwrap();
        }
        assert_eq!(ds, original);
    }

    // --- convolution ---

    #[test]
    fn test_flat_sharpen_is_four_times() {
        for cfg in configs() {
            let mut ds = ArrayDataset::from_fn(&[9, 6, 2], DataType::I32, |_| 25.0).unwrap();
            sharpen(&mut ds, &Scope::all(), &cfg).unwrap();
            assert!(ds.to_f64_vec().iter().all(|&v| v == 100.0));

            let mut ds = ArrayDataset::from_fn(&[9, 6], DataType::U8, |_| 70.0).unwrap();
            sharpen(&mut ds, &Scope::all(), &cfg).unwrap();
            assert!(ds.to_f64_vec().iter().all(|&v| v == 255.0));
        }
    }

    #[test]
    fn test_flat_region_sharpen_ignores_outside() {
        // Outside the region the plane is very different; it must not leak in.
        let mut ds = ArrayDataset::from_fn(&[8, 8], DataType::F64, |p| {
            if (2..6).contains(&p[0]) && (2..6).contains(&p[1]) { 1.5 } else { 1000.0 }
        })
        .unwrap();
        let region = Region::rect(&[8, 8], 2, 2, 4, 4);
        sharpen(&mut ds, &Scope::region(region.clone()), &EngineConfig::default()).unwrap();
        for pos in all_positions(&[8, 8]) {
            let expected = if region.contains(&pos) { 6.0 } else { 1000.0 };
            assert_eq!(ds.get(&pos), expected, "{pos:?}");
        }
    }

    // --- cross-crate pipelines ---

    #[test]
    fn test_convert_then_process() {
        let src = ramp(&[6, 6], DataType::U8);
        let mut float = convert(&src, DataType::F32).unwrap();
        apply_unary(&mut float, &UnaryOp::Multiply(0.5), &Scope::all()).unwrap();
        let back = convert(&float, DataType::U8).unwrap();
        for pos in all_positions(&[6, 6]) {
            assert_eq!(back.get(&pos), (src.get(&pos) * 0.5).trunc());
        }
    }

    #[test]
    fn test_combine_average() {
        let a = ArrayDataset::from_fn(&[4, 4], DataType::U8, |_| 10.0).unwrap();
        let b = ArrayDataset::from_fn(&[4, 4], DataType::U8, |_| 21.0).unwrap();
        let mut out = ArrayDataset::new(&[2, 2], DataType::U8).unwrap();
        engine::combine(
            &a,
            &Region::rect(&[4, 4], 0, 0, 2, 2),
            &b,
            &Region::rect(&[4, 4], 2, 2, 2, 2),
            &mut out,
            &Region::whole(&[2, 2]),
            &ij_ops::BinaryOp::Average,
        )
        .unwrap();
        assert!(out.to_f64_vec().iter().all(|&v| v == 15.0));
    }

    #[test]
    fn test_shadows_demo_restores() {
        use std::sync::atomic::AtomicBool;

        let mut ds = ramp(&[10, 10], DataType::U8);
        let original = ds.clone();
        let stop = AtomicBool::new(false);
        let mut distinct = Vec::new();
        let frames =
            ij_ops::shadows::shadows_demo(&mut ds, &Scope::all(), &stop, Some(8), |dir, f| {
                distinct.push((dir, f.clone()));
            })
            .unwrap();
        assert_eq!(frames, 8);
        assert_eq!(ds, original);
        let dirs: Vec<_> = distinct.iter().map(|(d, _)| *d).collect();
        assert_eq!(dirs, ij_ops::ShadowDirection::ALL.to_vec());
    }
}
