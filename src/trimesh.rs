//! Triangle storage with edge adjacency.

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::utils::types::{TriIdx, VertexIdx};

/// An undirected edge between two vertex indices.
///
/// The constructor normalizes the endpoint order, so the two orientations of
/// an edge map to the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub VertexIdx, pub VertexIdx);

impl EdgeKey {
    #[must_use]
    pub const fn new(a: VertexIdx, b: VertexIdx) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TriSlot {
    Tri([VertexIdx; 3]),
    Deleted,
}

/// Arena of triangles with an edge-to-owners adjacency map.
///
/// Triangle slots are append-only; removal tombstones a slot instead of
/// shifting later ones, so a triangle index stays valid for the lifetime of
/// the mesh and iteration over live slots follows creation order. The
/// adjacency map answers "which triangles carry this edge" in O(1), which is
/// what cavity-boundary walks and edge flips are built on. In a manifold
/// mesh every edge has one or two owners.
#[derive(Debug, Default, Clone)]
pub struct TriMesh {
    slots: Vec<TriSlot>,
    edge_tris: AHashMap<EdgeKey, SmallVec<[TriIdx; 2]>>,
    num_tris: usize,
    num_deleted_tris: usize,
}

impl TriMesh {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a triangle and registers its three edges. Returns the new
    /// triangle's index.
    pub fn add_tri(&mut self, tri: [VertexIdx; 3]) -> TriIdx {
        let idx = self.slots.len();
        self.slots.push(TriSlot::Tri(tri));
        for key in Self::edge_keys(&tri) {
            let owners = self.edge_tris.entry(key).or_default();
            owners.push(idx);
            debug_assert!(
                owners.len() <= 2,
                "edge {key:?} shared by more than two triangles"
            );
        }
        self.num_tris += 1;
        idx
    }

    /// Tombstones a triangle and unregisters its edges. Removing a dead or
    /// out-of-range index is a no-op.
    pub fn remove_tri(&mut self, idx: TriIdx) {
        let tri = match self.slots.get(idx) {
            Some(TriSlot::Tri(tri)) => *tri,
            _ => return,
        };
        self.slots[idx] = TriSlot::Deleted;
        for key in Self::edge_keys(&tri) {
            if let Some(owners) = self.edge_tris.get_mut(&key) {
                if let Some(pos) = owners.iter().position(|&owner| owner == idx) {
                    owners.swap_remove(pos);
                }
                if owners.is_empty() {
                    self.edge_tris.remove(&key);
                }
            }
        }
        self.num_tris -= 1;
        self.num_deleted_tris += 1;
    }

    /// The triangle stored at `idx`, if the slot is alive.
    #[must_use]
    pub fn tri(&self, idx: TriIdx) -> Option<[VertexIdx; 3]> {
        match self.slots.get(idx) {
            Some(TriSlot::Tri(tri)) => Some(*tri),
            _ => None,
        }
    }

    /// Iterates over the live triangles in creation order.
    pub fn iter_alive(&self) -> impl Iterator<Item = (TriIdx, [VertexIdx; 3])> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| match slot {
                TriSlot::Tri(tri) => Some((idx, *tri)),
                TriSlot::Deleted => None,
            })
    }

    /// The triangles carrying `key`; empty when the edge is not in the mesh.
    #[must_use]
    pub fn edge_owners(&self, key: EdgeKey) -> &[TriIdx] {
        self.edge_tris
            .get(&key)
            .map_or(&[], |owners| owners.as_slice())
    }

    #[must_use]
    pub fn has_edge(&self, key: EdgeKey) -> bool {
        self.edge_tris.contains_key(&key)
    }

    #[must_use]
    pub const fn num_tris(&self) -> usize {
        self.num_tris
    }

    #[must_use]
    pub const fn num_deleted_tris(&self) -> usize {
        self.num_deleted_tris
    }

    /// Checks that the arena and the adjacency map agree: every live
    /// triangle is registered under its three edges, and every adjacency
    /// entry points at live triangles that actually carry the edge.
    #[must_use]
    pub fn is_sound(&self) -> bool {
        for (idx, tri) in self.iter_alive() {
            for key in Self::edge_keys(&tri) {
                if !self.edge_owners(key).contains(&idx) {
                    return false;
                }
            }
        }
        for (key, owners) in &self.edge_tris {
            if owners.is_empty() || owners.len() > 2 {
                return false;
            }
            for &owner in owners {
                match self.slots.get(owner) {
                    Some(TriSlot::Tri(tri)) => {
                        if !Self::edge_keys(tri).contains(key) {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }

    fn edge_keys(tri: &[VertexIdx; 3]) -> [EdgeKey; 3] {
        [
            EdgeKey::new(tri[0], tri[1]),
            EdgeKey::new(tri[1], tri[2]),
            EdgeKey::new(tri[2], tri[0]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_key_normalizes() {
        assert_eq!(EdgeKey::new(4, 1), EdgeKey::new(1, 4));
        assert_eq!(EdgeKey::new(4, 1), EdgeKey(1, 4));
    }

    #[test]
    fn test_add_and_remove() {
        let mut mesh = TriMesh::new();
        let t0 = mesh.add_tri([0, 1, 2]);
        let t1 = mesh.add_tri([1, 3, 2]);
        assert_eq!(mesh.num_tris(), 2);
        assert_eq!(mesh.edge_owners(EdgeKey::new(1, 2)), &[t0, t1]);

        mesh.remove_tri(t0);
        assert_eq!(mesh.num_tris(), 1);
        assert_eq!(mesh.num_deleted_tris(), 1);
        assert_eq!(mesh.tri(t0), None);
        assert_eq!(mesh.tri(t1), Some([1, 3, 2]));
        assert_eq!(mesh.edge_owners(EdgeKey::new(1, 2)), &[t1]);
        assert!(!mesh.has_edge(EdgeKey::new(0, 1)));
    }

    #[test]
    fn test_remove_dead_slot_is_noop() {
        let mut mesh = TriMesh::new();
        mesh.add_tri([0, 1, 2]);
        mesh.remove_tri(0);
        mesh.remove_tri(0);
        mesh.remove_tri(17);
        assert_eq!(mesh.num_tris(), 0);
        assert_eq!(mesh.num_deleted_tris(), 1);
    }

    #[test]
    fn test_tombstones_keep_indices_stable() {
        let mut mesh = TriMesh::new();
        mesh.add_tri([0, 1, 2]);
        mesh.remove_tri(0);
        let idx = mesh.add_tri([0, 2, 3]);
        assert_eq!(idx, 1);
        assert_eq!(mesh.tri(0), None);
        assert_eq!(mesh.tri(1), Some([0, 2, 3]));
    }

    #[test]
    fn test_iter_alive_follows_creation_order() {
        let mut mesh = TriMesh::new();
        mesh.add_tri([0, 1, 2]);
        mesh.add_tri([1, 3, 2]);
        mesh.add_tri([3, 4, 2]);
        mesh.remove_tri(1);
        let alive: Vec<_> = mesh.iter_alive().collect();
        assert_eq!(alive, vec![(0, [0, 1, 2]), (2, [3, 4, 2])]);
    }

    #[test]
    fn test_is_sound() {
        let mut mesh = TriMesh::new();
        mesh.add_tri([0, 1, 2]);
        mesh.add_tri([1, 3, 2]);
        assert!(mesh.is_sound());
        mesh.remove_tri(0);
        assert!(mesh.is_sound());
    }

    #[test]
    fn test_is_sound_catches_stale_adjacency() {
        let mut mesh = TriMesh::new();
        mesh.add_tri([0, 1, 2]);
        mesh.add_tri([1, 3, 2]);
        // Tombstone behind the adjacency map's back.
        mesh.slots[1] = TriSlot::Deleted;
        assert!(!mesh.is_sound());
    }
}
