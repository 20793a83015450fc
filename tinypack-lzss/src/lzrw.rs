//! LZRW hash table for chained block matching.
//!
//! Each slot remembers the most recent dictionary position whose next three
//! bytes hashed to it. A lookup costs one probe and never walks a chain, so
//! some matches are missed in exchange for a constant-time search.
//!
//! Positions are stored in the dictionary space of the current call
//! (`prev ++ block`). When the window slides to the next block, every slot is
//! moved back by the length of the block that just fell out of the window.
//! Slots that would go negative become empty.

/// Shortest run the matcher will report.
pub const MIN_MATCH: usize = 3;

/// Fixed-size table of candidate dictionary positions.
#[derive(Debug, Clone)]
pub struct LzrwTable {
    slots: Vec<Option<usize>>,
}

impl LzrwTable {
    /// Create an empty table with `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Forget every candidate.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Slot for the three bytes `b0 b1 b2`.
    #[inline]
    pub fn hash(&self, b0: u8, b1: u8, b2: u8) -> usize {
        let (b0, b1, b2) = (b0 as usize, b1 as usize, b2 as usize);
        (b0 + (b0 << 4) + b1 + b2) % self.slots.len()
    }

    /// Candidate stored in `slot`.
    pub fn get(&self, slot: usize) -> Option<usize> {
        self.slots[slot]
    }

    /// Slide every candidate back by `shift` positions.
    pub fn age(&mut self, shift: usize) {
        if shift == 0 {
            return;
        }
        for slot in &mut self.slots {
            *slot = slot.and_then(|pos| pos.checked_sub(shift));
        }
    }

    /// Look for a run starting at `block[pos]` and record `pos` as the newest
    /// candidate for its hash.
    ///
    /// The dictionary is `prev` followed by `block`. A run may overlap the
    /// bytes it produces, since the decoder copies one byte at a time.
    /// Returns `(offset, length)` with `MIN_MATCH <= length <= max_len`.
    pub fn find_match(
        &mut self,
        prev: &[u8],
        block: &[u8],
        pos: usize,
        max_len: usize,
    ) -> Option<(usize, usize)> {
        if block.len() - pos < MIN_MATCH {
            return None;
        }

        let current = prev.len() + pos;
        let slot = self.hash(block[pos], block[pos + 1], block[pos + 2]);
        let candidate = self.slots[slot].filter(|&start| start < current);
        self.slots[slot] = Some(current);

        let start = candidate?;
        let dictionary_byte = |idx: usize| {
            if idx < prev.len() {
                prev[idx]
            } else {
                block[idx - prev.len()]
            }
        };

        let max_len = max_len.min(block.len() - pos);
        let mut length = 0;
        while length < max_len && dictionary_byte(start + length) == block[pos + length] {
            length += 1;
        }

        (length >= MIN_MATCH).then_some((start, length))
    }
}
