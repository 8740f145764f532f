use skip_quadtree_rs::SkipQuadtree;

// Inserts every point, asserting each insert reports success.
//
// This function only gets used in tests.
#[allow(dead_code)]
pub fn insert_all<const D: usize>(tree: &mut SkipQuadtree<f64, D>, points: &[[f64; D]]) {
    for p in points {
        assert!(tree.insert((*p).into()), "insert failed for {:?}", p);
    }
}

// Asserts the tree's membership matches `expected` exactly, for both the
// points it should hold and the probes it should not.
#[allow(dead_code)]
pub fn assert_membership<const D: usize>(
    tree: &SkipQuadtree<f64, D>,
    expected: &[[f64; D]],
    absent: &[[f64; D]],
) {
    for p in expected {
        assert!(tree.search((*p).into()), "expected {:?} present", p);
    }
    for p in absent {
        assert!(!tree.search((*p).into()), "expected {:?} absent", p);
    }
    assert_eq!(tree.len(), expected.len());
}
