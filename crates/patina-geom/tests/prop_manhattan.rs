use patina_geom::{BlockPos, ManhattanBall, ball_len};
use proptest::prelude::*;
use std::collections::HashSet;

fn small_i32() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

fn arb_pos() -> impl Strategy<Value = BlockPos> {
    (small_i32(), small_i32(), small_i32()).prop_map(|(x, y, z)| BlockPos::new(x, y, z))
}

proptest! {
    // Enumeration is sorted by distance, never leaves the ball, and visits each cell once
    #[test]
    fn ball_sorted_unique_and_bounded(radius in 0u32..=6, center in arb_pos()) {
        let ball = ManhattanBall::new(radius);
        prop_assert_eq!(ball.len(), ball_len(radius));
        let mut seen = HashSet::new();
        let mut last = 0u32;
        for (p, dist) in ball.around(center) {
            prop_assert_eq!(center.manhattan(p), dist);
            prop_assert!(dist <= radius);
            prop_assert!(dist >= last);
            last = dist;
            prop_assert!(seen.insert(p));
        }
    }

    // Every cell within the radius appears (ball is a diamond, not a cube)
    #[test]
    fn ball_covers_every_cell_in_range(radius in 0u32..=5) {
        let ball = ManhattanBall::new(radius);
        let cells: HashSet<BlockPos> = ball.offsets().iter().map(|(d, _)| *d).collect();
        let r = radius as i32;
        for dy in -r..=r { for dz in -r..=r { for dx in -r..=r {
            let d = BlockPos::new(dx, dy, dz);
            let inside = d.manhattan(BlockPos::ORIGIN) <= radius;
            prop_assert_eq!(cells.contains(&d), inside);
        }}}
    }

    // Manhattan distance is symmetric and satisfies the triangle inequality
    #[test]
    fn manhattan_metric(a in arb_pos(), b in arb_pos(), c in arb_pos()) {
        prop_assert_eq!(a.manhattan(b), b.manhattan(a));
        prop_assert!(a.manhattan(c) <= a.manhattan(b) + b.manhattan(c));
        prop_assert_eq!(a.manhattan(a), 0);
    }
}
