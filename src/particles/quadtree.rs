//! Point quadtree used as the broad-phase spatial index.
//!
//! The tree partitions the arena into axis-aligned rectangular regions and
//! answers "which particles fall inside this rectangle" in better than linear
//! time. Nodes store stable particle identifiers (indices into the solver's
//! particle arena), never references, so the tree and the arena cannot alias.
//! The solver discards and rebuilds the whole tree at the start of every tick.

use log::warn;

/// An axis-aligned rectangle with its origin at the top-left corner.
///
/// Point membership is half-open: the left and top edges are included, the
/// right and bottom edges are excluded. This keeps quadrant membership
/// unambiguous for points sitting exactly on a subdivision seam.
///
/// # Examples
///
/// ```
/// use rs_collisions::particles::Rect;
///
/// let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
/// assert!(rect.contains(0.0, 0.0));   // left/top edges are included
/// assert!(rect.contains(9.999, 5.0));
/// assert!(!rect.contains(10.0, 5.0)); // right/bottom edges are excluded
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    /// Returns true if the point (px, py) lies inside this rectangle.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x &&
            px < self.x + self.w &&
            py >= self.y &&
            py < self.y + self.h
    }

    /// Returns true if the two rectangles overlap on a region of nonzero area.
    ///
    /// Rectangles that touch only along an edge do not intersect: with
    /// half-open membership no point can belong to both, so the query pruning
    /// that relies on this test never misses a particle.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_collisions::particles::Rect;
    ///
    /// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    /// assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    /// assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0))); // edge contact only
    /// ```
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w &&
            other.x < self.x + self.w &&
            self.y < other.y + other.h &&
            other.y < self.y + self.h
    }
}

/// A particle's entry in the quadtree: its arena identifier and the position
/// it was inserted at. Positions are captured at insertion time; the tree is
/// not updated when particles move (it is rebuilt instead).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticlePoint {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

/// A quadtree node covering an axis-aligned rectangular region.
///
/// A node is either a leaf (`children` is `None`, holding at most `capacity`
/// points) or internal (four children in NE, NW, SE, SW order). An internal
/// node's `points` list is empty except for points that failed every quadrant
/// test during insertion — a defensive fallback that keeps such points
/// queryable instead of dropping them.
///
/// # Examples
///
/// ```
/// use rs_collisions::particles::{QuadTree, Rect};
///
/// let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 600.0), 5);
/// assert!(tree.insert(0, 100.0, 100.0));
/// assert!(!tree.insert(1, -5.0, 100.0)); // outside the boundary
///
/// let mut found = Vec::new();
/// tree.query(&Rect::new(90.0, 90.0, 20.0, 20.0), &mut found);
/// assert_eq!(found, vec![0]);
/// ```
#[derive(Debug, Clone)]
pub struct QuadTree {
    /// The region this node covers.
    pub boundary: Rect,
    /// Maximum number of points a leaf holds before subdividing.
    pub capacity: usize,
    /// Points held directly by this node.
    pub points: Vec<ParticlePoint>,
    /// Child quadrants in NE, NW, SE, SW order, present once subdivided.
    pub children: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    /// Creates an empty leaf covering `boundary`.
    pub fn new(boundary: Rect, capacity: usize) -> Self {
        QuadTree {
            boundary,
            capacity,
            points: Vec::new(),
            children: None,
        }
    }

    /// Returns true once this node has subdivided into four quadrants.
    pub fn is_divided(&self) -> bool {
        self.children.is_some()
    }

    /// Inserts a particle's position under the given identifier.
    ///
    /// Returns false if the position lies outside this node's boundary.
    /// A leaf with room appends directly; a full leaf subdivides first,
    /// redistributing its points into whichever child claims them, and then
    /// the new point is offered to the children in NE, NW, SE, SW order.
    ///
    /// A point inside this node that no child accepts would indicate a
    /// quadrant-math inconsistency; such a point is retained here (and the
    /// event logged) rather than dropped, so it still shows up in queries.
    pub fn insert(&mut self, id: usize, x: f64, y: f64) -> bool {
        if !self.boundary.contains(x, y) {
            return false;
        }

        if self.children.is_none() && self.points.len() < self.capacity {
            self.points.push(ParticlePoint { id, x, y });
            return true;
        }

        if self.children.is_none() {
            self.subdivide();
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.insert(id, x, y) {
                    return true;
                }
            }
        }

        warn!(
            "quadtree: no quadrant claimed point ({}, {}) inside {:?}; retaining in parent",
            x, y, self.boundary
        );
        self.points.push(ParticlePoint { id, x, y });
        true
    }

    /// Splits this node into four quadrants and moves its points down.
    ///
    /// The split is at half the width and height; the east and south children
    /// absorb the floating-point remainder (`w - w/2`, `h - h/2`), so the four
    /// quadrants exactly tile the parent and no seam is left uncovered for any
    /// real-valued extent.
    fn subdivide(&mut self) {
        let Rect { x, y, w, h } = self.boundary;
        let hw = w / 2.0;
        let hh = h / 2.0;

        let quadrants = [
            Rect::new(x + hw, y, w - hw, hh),          // NE
            Rect::new(x, y, hw, hh),                   // NW
            Rect::new(x + hw, y + hh, w - hw, h - hh), // SE
            Rect::new(x, y + hh, hw, h - hh),          // SW
        ];
        let mut children = Box::new(quadrants.map(|q| QuadTree::new(q, self.capacity)));

        let existing = std::mem::take(&mut self.points);
        for point in existing {
            let mut claimed = false;
            for child in children.iter_mut() {
                if child.insert(point.id, point.x, point.y) {
                    claimed = true;
                    break;
                }
            }
            if !claimed {
                warn!(
                    "quadtree: no quadrant claimed redistributed point ({}, {}); retaining in parent",
                    point.x, point.y
                );
                self.points.push(point);
            }
        }

        self.children = Some(children);
    }

    /// Appends the identifiers of every stored point lying inside `range`.
    ///
    /// Subtrees whose boundary does not intersect `range` are pruned without
    /// recursion. Each particle is stored in exactly one node, so no
    /// identifier is ever appended twice. The output order is the tree's
    /// traversal order, which is deterministic for a fixed insertion order.
    ///
    /// The accumulator is not cleared; callers reuse it across queries.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_collisions::particles::{QuadTree, Rect};
    ///
    /// let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0), 2);
    /// tree.insert(0, 10.0, 10.0);
    /// tree.insert(1, 90.0, 90.0);
    /// tree.insert(2, 12.0, 11.0);
    ///
    /// let mut found = Vec::new();
    /// tree.query(&Rect::new(0.0, 0.0, 50.0, 50.0), &mut found);
    /// found.sort();
    /// assert_eq!(found, vec![0, 2]);
    /// ```
    pub fn query(&self, range: &Rect, found: &mut Vec<usize>) {
        if !self.boundary.intersects(range) {
            return;
        }

        for point in &self.points {
            if range.contains(point.x, point.y) {
                found.push(point.id);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(range, found);
            }
        }
    }

    /// Removes the entry stored under `id`, wherever it lives in the tree.
    ///
    /// Returns false if no entry with that identifier exists. Sibling order is
    /// preserved so query determinism is unaffected.
    pub fn remove(&mut self, id: usize) -> bool {
        if let Some(index) = self.points.iter().position(|p| p.id == id) {
            self.points.remove(index);
            return true;
        }
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.remove(id) {
                    return true;
                }
            }
        }
        false
    }

    /// Repositions an entry: removes it and re-inserts it at (x, y).
    ///
    /// Returns false if the new position lies outside the tree. This is a
    /// maintenance utility; the solver never calls it — it rebuilds the whole
    /// tree each tick instead.
    pub fn update(&mut self, id: usize, x: f64, y: f64) -> bool {
        self.remove(id);
        self.insert(id, x, y)
    }

    /// Returns the total number of points stored in this subtree.
    pub fn len(&self) -> usize {
        let mut count = self.points.len();
        if let Some(children) = &self.children {
            for child in children.iter() {
                count += child.len();
            }
        }
        count
    }

    /// Returns true if no points are stored in this subtree.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if an entry with the given identifier is stored anywhere
    /// in this subtree.
    pub fn contains_id(&self, id: usize) -> bool {
        if self.points.iter().any(|p| p.id == id) {
            return true;
        }
        match &self.children {
            Some(children) => children.iter().any(|c| c.contains_id(id)),
            None => false,
        }
    }

    /// Appends every node's boundary rectangle, this node first.
    ///
    /// Read-only traversal for visualization; renderers draw the returned
    /// rectangles to show the current partitioning.
    pub fn boundaries(&self, out: &mut Vec<Rect>) {
        out.push(self.boundary);
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.boundaries(out);
            }
        }
    }
}
