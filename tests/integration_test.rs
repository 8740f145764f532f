// Copyright 2019 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod util; // For insert_all / assert_membership.

use skip_quadtree_rs::SkipQuadtree;

// The canonical test configuration: the square of side 2 centred on the
// origin, with a tolerance of 1e-9.
fn tree2() -> SkipQuadtree<f64, 2> {
    SkipQuadtree::with_precision(2.0, [0.0, 0.0], 1e-9)
}

mod new {
    use super::*;

    #[test]
    fn new_with_center_and_length() {
        // None of these should crash.
        let _t0 = SkipQuadtree::<f64, 1>::new(1.0, [0.0]);
        let _t1 = SkipQuadtree::<f64, 2>::new(2.0, [0.0, 0.0]);
        let _t2 = SkipQuadtree::<f64, 3>::new(8.0, [4.0, -4.0, 0.5]);
    }

    #[test]
    fn new_with_precision() {
        let t = SkipQuadtree::<f64, 2>::with_precision(2.0, [1.0, 1.0], 1e-6);
        assert_eq!(t.precision(), 1e-6);
        assert_eq!(t.length(), 2.0);
        assert_eq!(*t.center().coords(), [1.0, 1.0]);
    }

    #[test]
    fn starts_as_one_empty_level() {
        let t = tree2();
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
        assert_eq!(t.levels(), 1);
    }
}

#[test]
fn empty_search_and_remove() {
    let mut t = tree2();
    assert!(!t.search([0.0, 0.0].into()));
    assert!(!t.remove([0.0, 0.0].into()));
    assert!(t.is_empty());
}

#[test]
fn centre_insert() {
    let mut t = tree2();
    assert!(t.insert([0.0, 0.0].into()));
    assert!(t.search([0.0, 0.0].into()));
    assert!(!t.insert([0.0, 0.0].into()));
    assert_eq!(t.len(), 1);
}

#[test]
fn two_points_sharing_a_quadrant() {
    let mut t = tree2();
    assert!(t.insert([0.25, 0.25].into()));
    assert!(t.insert([0.375, 0.375].into()));
    assert!(t.search([0.25, 0.25].into()));
    assert!(t.search([0.375, 0.375].into()));
    assert_eq!(t.len(), 2);
}

#[test]
fn skip_list_gap_split_grows_a_level() {
    let mut t = tree2();
    util::insert_all(&mut t, &[[0.1, 0.0], [0.2, 0.0], [0.3, 0.0], [0.4, 0.0]]);

    // The fourth insert walks through a gap of three and promotes its middle
    // point, so the level stack must have grown past the initial
    // ground-plus-empty-top pair.
    assert!(t.levels() >= 2);
    util::assert_membership(
        &t,
        &[[0.1, 0.0], [0.2, 0.0], [0.3, 0.0], [0.4, 0.0]],
        &[[0.25, 0.0]],
    );
}

#[test]
fn delete_collapses_the_shared_square() {
    let mut t = tree2();
    util::insert_all(&mut t, &[[0.25, 0.25], [0.375, 0.375]]);

    assert!(t.remove([0.375, 0.375].into()));
    util::assert_membership(&t, &[[0.25, 0.25]], &[[0.375, 0.375]]);
}

mod bounds {
    use super::*;

    #[test]
    fn high_face_exclusive_low_face_inclusive() {
        let mut t = tree2();
        assert!(!t.insert([1.0, 0.0].into()));
        assert!(t.insert([-1.0, 0.0].into()));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn far_out_of_bounds() {
        let mut t = tree2();
        assert!(!t.insert([17.0, -3.0].into()));
        assert!(!t.search([17.0, -3.0].into()));
        assert!(!t.remove([17.0, -3.0].into()));
    }

    #[test]
    fn corners() {
        let mut t = tree2();
        assert!(t.insert([-1.0, -1.0].into()));
        assert!(!t.insert([1.0, 1.0].into()));
        assert!(!t.insert([-1.0, 1.0].into()));
        assert!(!t.insert([1.0, -1.0].into()));
    }
}

mod laws {
    use super::*;

    #[test]
    fn double_insert_is_a_noop() {
        let mut t = tree2();
        assert!(t.insert([0.5, -0.5].into()));
        let levels = t.levels();

        assert!(!t.insert([0.5, -0.5].into()));
        assert_eq!(t.len(), 1);
        assert_eq!(t.levels(), levels);
    }

    #[test]
    fn double_remove_is_a_noop() {
        let mut t = tree2();
        util::insert_all(&mut t, &[[0.5, -0.5], [-0.25, 0.75]]);

        assert!(t.remove([0.5, -0.5].into()));
        let levels = t.levels();
        assert!(!t.remove([0.5, -0.5].into()));
        assert_eq!(t.len(), 1);
        assert_eq!(t.levels(), levels);
    }

    #[test]
    fn insert_then_remove_restores_membership() {
        let mut t = tree2();
        let keep = [[0.1, 0.1], [-0.3, 0.2], [0.7, -0.7]];
        util::insert_all(&mut t, &keep);

        assert!(t.insert([-0.9, -0.9].into()));
        assert!(t.remove([-0.9, -0.9].into()));

        util::assert_membership(&t, &keep, &[[-0.9, -0.9]]);
    }

    #[test]
    fn duplicates_within_tolerance_are_one_point() {
        let mut t = SkipQuadtree::<f64, 2>::with_precision(2.0, [0.0, 0.0], 1e-3);
        assert!(t.insert([0.5, 0.5].into()));
        assert!(!t.insert([0.5 + 1e-4, 0.5 - 1e-4].into()));
        assert!(t.search([0.5 + 1e-4, 0.5].into()));

        // Removing through a tolerance-equal alias removes the point.
        assert!(t.remove([0.5 - 1e-4, 0.5].into()));
        assert!(t.is_empty());
    }
}

mod clear {
    use super::*;

    #[test]
    fn reports_released_nodes() {
        let mut t = tree2();
        util::insert_all(&mut t, &[[0.1, 0.0], [0.2, 0.0], [0.3, 0.0], [0.4, 0.0]]);
        let levels = t.levels() as u64;

        let report = t.clear();
        // One root per level, at least one point node per stored point, and
        // nothing dirty in a serial tree.
        assert_eq!(report.levels, levels);
        assert!(report.leaf >= 4);
        assert!(report.total >= report.leaf + levels);
        assert_eq!(report.clean, report.total);

        assert!(t.is_empty());
        assert_eq!(t.levels(), 1);
        assert!(!t.search([0.1, 0.0].into()));
    }

    #[test]
    fn tree_is_reusable_after_clear() {
        let mut t = tree2();
        util::insert_all(&mut t, &[[0.1, 0.1], [0.2, 0.2]]);
        t.clear();

        assert!(t.insert([0.1, 0.1].into()));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn double_clear_is_safe() {
        let mut t = tree2();
        t.insert([0.5, 0.5].into());
        t.clear();
        let report = t.clear();
        assert_eq!(report.leaf, 0);
        assert_eq!(report.levels, 1);
    }
}

mod other_dimensions {
    use super::*;

    #[test]
    fn one_dimensional_line() {
        let mut t = SkipQuadtree::<f64, 1>::new(2.0, [0.0]);
        for i in 0..20 {
            assert!(t.insert([-0.95 + (i as f64) * 0.09].into()));
        }
        assert_eq!(t.len(), 20);
        assert!(t.search([-0.95].into()));
        assert!(t.remove([-0.95].into()));
        assert!(!t.search([-0.95].into()));
        assert_eq!(t.len(), 19);
    }

    #[test]
    fn three_dimensional_octants() {
        let mut t = SkipQuadtree::<f64, 3>::new(2.0, [0.0, 0.0, 0.0]);
        // One point per octant.
        for qx in [-0.5, 0.5] {
            for qy in [-0.5, 0.5] {
                for qz in [-0.5, 0.5] {
                    assert!(t.insert([qx, qy, qz].into()));
                }
            }
        }
        assert_eq!(t.len(), 8);
        assert!(t.search([0.5, -0.5, 0.5].into()));
        assert!(t.remove([0.5, -0.5, 0.5].into()));
        assert_eq!(t.len(), 7);
    }
}

// We should be able to run a long mixed workload through the public surface.
#[test]
fn grows_and_shrinks_through_a_full_cycle() {
    let mut t = tree2();
    let points: Vec<[f64; 2]> = (0..64)
        .map(|i| {
            let x = -0.99 + (i % 8) as f64 * 0.25;
            let y = -0.99 + (i / 8) as f64 * 0.25;
            [x, y]
        })
        .collect();

    util::insert_all(&mut t, &points);
    assert_eq!(t.len(), 64);
    assert!(t.levels() >= 3);

    for p in &points {
        assert!(t.remove((*p).into()));
    }
    assert!(t.is_empty());
    assert_eq!(t.levels(), 1);
}
