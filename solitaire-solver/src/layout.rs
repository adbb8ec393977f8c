use solitaire_common::shape::{BOARD_SIZE, Shape};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

pub type LayoutId = u16;

/// One reachable occupancy of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub mask: u32,
    /// Occupied positions no other occupied position rests on.
    pub uncovered: SmallVec<[u8; 16]>,
    pub positions: SmallVec<[u8; BOARD_SIZE]>,
}

/// Every board occupancy reachable by legal removals, for one board shape.
///
/// A position may only be empty if every position covering it is empty too,
/// so the table is purely combinatorial and independent of the deal. Build it
/// once and share it by reference between solver runs.
#[derive(Debug, Clone)]
pub struct LayoutTable {
    shape: Shape,
    layouts: Vec<Layout>,
    index: FxHashMap<u32, LayoutId>,
}

impl LayoutTable {
    pub fn new(shape: Shape) -> Self {
        let mut masks = vec![];
        let bottom = shape.rows().len() - 1;
        enumerate(&shape, bottom, 0, &mut masks);
        masks.sort_unstable();

        let mut layouts = Vec::with_capacity(masks.len());
        let mut index = FxHashMap::default();
        index.reserve(masks.len());
        for (id, &mask) in masks.iter().enumerate() {
            let present = mask as u64;
            let positions = (0..BOARD_SIZE as u8)
                .filter(|&p| present & (1 << p) != 0)
                .collect::<SmallVec<_>>();
            let uncovered = positions
                .iter()
                .copied()
                .filter(|&p| shape.is_uncovered(p, present))
                .collect();
            layouts.push(Layout {
                mask,
                uncovered,
                positions,
            });
            index.insert(mask, id as LayoutId);
        }
        log::debug!(
            "{:<32}{:<16}{}",
            "enumerated layouts",
            shape.variant(),
            layouts.len()
        );

        Self {
            shape,
            layouts,
            index,
        }
    }

    pub fn pyramid() -> Self {
        Self::new(Shape::pyramid())
    }

    pub fn tri_peaks() -> Self {
        Self::new(Shape::tri_peaks())
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    #[inline]
    pub fn get(&self, id: LayoutId) -> &Layout {
        &self.layouts[id as usize]
    }

    #[inline]
    pub fn id_of(&self, mask: u32) -> Option<LayoutId> {
        self.index.get(&mask).copied()
    }

    /// The layout with every position occupied.
    pub fn full(&self) -> LayoutId {
        (self.layouts.len() - 1) as LayoutId
    }

    /// The layout left after taking the uncovered `position` away, if it is uncovered.
    #[inline]
    pub fn remove(&self, id: LayoutId, position: u8) -> Option<LayoutId> {
        let layout = self.get(id);
        if !layout.uncovered.contains(&position) {
            return None;
        }
        self.id_of(layout.mask & !(1 << position))
    }
}

/// Fills `masks` row by row from the bottom: the occupied cells of a row force
/// the cells they cover in the row above, the remaining cells are free.
fn enumerate(shape: &Shape, row: usize, present: u64, masks: &mut Vec<u32>) {
    let cells = &shape.rows()[row];
    let mut forced = 0u64;
    let mut free: SmallVec<[u8; 16]> = SmallVec::new();
    for &p in cells {
        if shape.covered_by(p) & present != 0 {
            forced |= 1 << p;
        } else {
            free.push(p);
        }
    }
    for subset in 0..(1u32 << free.len()) {
        let mut next = present | forced;
        for (bit, &p) in free.iter().enumerate() {
            if subset & (1 << bit) != 0 {
                next |= 1 << p;
            }
        }
        if row == 0 {
            masks.push(next as u32);
        } else {
            enumerate(shape, row - 1, next, masks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use solitaire_common::shape::BOARD_MASK;

    #[test]
    fn test_pyramid_layouts() {
        let table = LayoutTable::pyramid();
        assert_eq!(table.len(), 1430);
        let full = table.get(table.full());
        assert_eq!(full.mask as u64, BOARD_MASK);
        assert_eq!(full.uncovered.as_slice(), &[21, 22, 23, 24, 25, 26, 27]);
        assert_eq!(full.positions.len(), 28);
        let empty = table.get(table.id_of(0).unwrap());
        assert!(empty.uncovered.is_empty());
    }

    #[test]
    fn test_tri_peaks_layouts() {
        let table = LayoutTable::tri_peaks();
        assert_eq!(table.len(), 22932);
        let full = table.get(table.full());
        assert_eq!(full.uncovered.len(), 10);
        assert_eq!(table.id_of(0), Some(0));
    }

    #[test]
    fn test_remove() {
        let table = LayoutTable::pyramid();
        let full = table.full();
        // the apex is covered
        assert_eq!(table.remove(full, 0), None);
        let id = table.remove(full, 21).unwrap();
        assert_eq!(table.get(id).mask as u64, BOARD_MASK & !(1 << 21));
        // removing 21 and 22 uncovers 15
        let id = table.remove(id, 22).unwrap();
        assert!(table.get(id).uncovered.contains(&15));
        assert_eq!(table.remove(id, 21), None);
    }

    #[test]
    fn test_every_layout_is_closed() {
        let table = LayoutTable::tri_peaks();
        for id in 0..table.len() as LayoutId {
            let layout = table.get(id);
            let present = layout.mask as u64;
            for p in 0..BOARD_SIZE as u8 {
                // nothing rests on an empty cell
                if present & (1 << p) == 0 {
                    assert_eq!(table.shape().covered_by(p) & present, 0);
                }
            }
            for &p in &layout.uncovered {
                assert!(table.remove(id, p).is_some());
            }
        }
    }
}
