use crate::particles::{QuadTree, Rect};

fn assert_node_invariants(node: &QuadTree) {
    if let Some(children) = &node.children {
        assert!(node.points.is_empty(),
                "Internal node retained fallback points: {:?}", node.points);
        for child in children.iter() {
            assert_node_invariants(child);
        }
    } else {
        assert!(node.points.len() <= node.capacity,
                "Leaf holds {} points with capacity {}", node.points.len(), node.capacity);
    }
}

#[test]
fn test_rect_membership_is_half_open() {
    let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(rect.contains(0.0, 0.0), "Left/top corner should be included");
    assert!(rect.contains(0.0, 9.999));
    assert!(!rect.contains(10.0, 5.0), "Right edge should be excluded");
    assert!(!rect.contains(5.0, 10.0), "Bottom edge should be excluded");
    assert!(!rect.contains(-0.001, 5.0));
}

#[test]
fn test_rect_intersects_excludes_edge_contact() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    assert!(a.intersects(&Rect::new(-5.0, -5.0, 20.0, 20.0)));
    assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)),
            "Rectangles sharing only an edge have no common member point");
    assert!(!a.intersects(&Rect::new(0.0, 20.0, 10.0, 10.0)));
}

#[test]
fn test_insert_outside_boundary_is_rejected() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0), 4);
    assert!(!tree.insert(0, -1.0, 50.0));
    assert!(!tree.insert(1, 100.0, 50.0)); // right edge is excluded
    assert!(tree.is_empty());
}

#[test]
fn test_leaf_holds_points_up_to_capacity() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0), 4);
    for id in 0..4 {
        assert!(tree.insert(id, 10.0 + id as f64, 10.0));
    }
    assert!(!tree.is_divided(), "Tree should not subdivide below capacity");
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_overflow_triggers_subdivision() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0), 4);
    for id in 0..5 {
        assert!(tree.insert(id, 10.0 + 15.0 * id as f64, 10.0 + 15.0 * id as f64));
    }
    assert!(tree.is_divided(), "Exceeding capacity should subdivide");
    assert_eq!(tree.len(), 5, "No point may be lost during redistribution");
    assert!(tree.points.is_empty(),
            "All points should have moved into children after subdivision");
}

#[test]
fn test_subdivision_children_exactly_tile_the_parent() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 7.0, 5.0), 1);
    tree.insert(0, 1.0, 1.0);
    tree.insert(1, 6.0, 4.0);
    let children = tree.children.as_ref().expect("Tree should have subdivided");

    // NE, NW, SE, SW: east and south children absorb the remainder.
    assert_eq!(children[0].boundary, Rect::new(3.5, 0.0, 3.5, 2.5));
    assert_eq!(children[1].boundary, Rect::new(0.0, 0.0, 3.5, 2.5));
    assert_eq!(children[2].boundary, Rect::new(3.5, 2.5, 3.5, 2.5));
    assert_eq!(children[3].boundary, Rect::new(0.0, 2.5, 3.5, 2.5));

    // Widths and heights along each axis sum back to the parent extent.
    assert_eq!(children[1].boundary.w + children[0].boundary.w, tree.boundary.w);
    assert_eq!(children[1].boundary.h + children[3].boundary.h, tree.boundary.h);
}

#[test]
fn test_seam_insertion_on_odd_extents() {
    // A point exactly on the subdivision seam must be claimed by exactly one
    // quadrant (the east/south side, which owns its left/top edges).
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 7.0, 5.0), 1);
    tree.insert(0, 1.0, 1.0);
    tree.insert(1, 6.0, 4.0);
    assert!(tree.insert(2, 3.5, 2.5), "Seam point must be insertable");

    let claimants = tree.children.as_ref().expect("divided")
        .iter()
        .filter(|c| c.contains_id(2))
        .count();
    assert_eq!(claimants, 1, "Seam point must live in exactly one quadrant");

    let mut found = Vec::new();
    tree.query(&tree.boundary.clone(), &mut found);
    found.sort();
    assert_eq!(found, vec![0, 1, 2], "Full-boundary query must see every inserted point");
}

#[test]
fn test_query_completeness_and_containment() {
    // Deterministic scatter of 200 distinct points over the arena.
    let positions: Vec<(f64, f64)> = (0..200)
        .map(|i| (((i * 37) % 800) as f64, ((i * 53) % 600) as f64))
        .collect();

    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 600.0), 5);
    for (id, &(x, y)) in positions.iter().enumerate() {
        assert!(tree.insert(id, x, y), "In-bounds point {} must insert", id);
    }
    assert_eq!(tree.len(), 200);

    let range = Rect::new(100.0, 150.0, 250.0, 200.0);
    let mut found = Vec::new();
    tree.query(&range, &mut found);

    // No false positives: every returned point lies inside the range.
    for &id in &found {
        let (x, y) = positions[id];
        assert!(range.contains(x, y), "Point {} at ({}, {}) outside query range", id, x, y);
    }

    // No omissions, no duplicates: the result matches a brute-force scan.
    let mut expected: Vec<usize> = positions.iter().enumerate()
        .filter(|(_, &(x, y))| range.contains(x, y))
        .map(|(id, _)| id)
        .collect();
    let mut sorted = found.clone();
    sorted.sort();
    expected.sort();
    assert_eq!(sorted, expected);
}

#[test]
fn test_query_is_idempotent() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 600.0), 5);
    for i in 0..100 {
        tree.insert(i, ((i * 29) % 800) as f64, ((i * 41) % 600) as f64);
    }

    let range = Rect::new(200.0, 100.0, 300.0, 300.0);
    let mut first = Vec::new();
    let mut second = Vec::new();
    tree.query(&range, &mut first);
    tree.query(&range, &mut second);
    assert_eq!(first, second, "Re-querying an unmodified tree must yield identical ordered results");
}

#[test]
fn test_capacity_invariant_holds_across_the_tree() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 600.0), 5);
    for i in 0..200 {
        tree.insert(i, ((i * 37) % 800) as f64, ((i * 53) % 600) as f64);
    }
    // With exact quadrant tiling, no in-bounds insertion may fall back to a
    // parent node and no leaf may exceed its capacity.
    assert_node_invariants(&tree);
}

#[test]
fn test_remove_and_reposition() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0), 2);
    tree.insert(0, 10.0, 10.0);
    tree.insert(1, 80.0, 80.0);
    tree.insert(2, 15.0, 12.0);
    assert!(tree.contains_id(2));

    assert!(tree.update(2, 90.0, 20.0), "Reposition inside the boundary must succeed");
    assert_eq!(tree.len(), 3);

    let mut found = Vec::new();
    tree.query(&Rect::new(0.0, 0.0, 30.0, 30.0), &mut found);
    assert!(!found.contains(&2), "Old region must no longer report the moved point");

    found.clear();
    tree.query(&Rect::new(80.0, 10.0, 20.0, 20.0), &mut found);
    assert_eq!(found, vec![2], "New region must report the moved point");

    assert!(tree.remove(1));
    assert!(!tree.contains_id(1));
    assert!(!tree.remove(1), "Removing an absent id must report false");
}

#[test]
fn test_boundaries_traversal_yields_every_node() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0), 1);
    tree.insert(0, 10.0, 10.0);

    let mut rects = Vec::new();
    tree.boundaries(&mut rects);
    assert_eq!(rects, vec![tree.boundary], "Undivided tree exposes only its own boundary");

    tree.insert(1, 90.0, 90.0);
    rects.clear();
    tree.boundaries(&mut rects);
    assert_eq!(rects.len(), 5, "Root plus four quadrants after one subdivision");
    assert_eq!(rects[0], tree.boundary, "Traversal starts at the root");
}
