use std::ops::Index;
/// Fixed-capacity history where index 0 is the most recent sample and
/// `len() - 1` the oldest.
///
/// Storage is a ring with a moving logical head, so `push` is O(1) while the
/// observable order matches a buffer that physically shifts every element
/// one slot toward the tail.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollingBuffer<T> {
    data: Vec<T>, // physical slots
    head: usize,  // physical index of logical slot 0
}
impl<T: Copy> ScrollingBuffer<T> {
    pub fn new(capacity: usize, fill: T) -> Self {
        Self {
            data: vec![fill; capacity],
            head: 0,
        }
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Evicts the oldest sample and writes `sample` at index 0.
    pub fn push(&mut self, sample: T) {
        let capacity = self.data.len();
        if capacity == 0 {
            return;
        }
        // the slot that held the oldest sample becomes the new head
        self.head = (self.head + capacity - 1) % capacity;
        self.data[self.head] = sample;
    }
    /// Scrolls by one step without fresh input, writing `fill` at the head.
    pub fn shift_decay(&mut self, fill: T) {
        self.push(fill);
    }
    pub fn get(&self, index: usize) -> Option<T> {
        self.physical(index).map(|p| self.data[p])
    }
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let p = self.physical(index)?;
        Some(&mut self.data[p])
    }
    /// Writes `value` at logical `index`; returns false when out of range.
    pub fn set(&mut self, index: usize, value: T) -> bool {
        match self.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
    /// Iterates from most recent to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (older, newer) = self.data.split_at(self.head);
        newer.iter().chain(older.iter())
    }
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().copied().collect()
    }
    fn physical(&self, index: usize) -> Option<usize> {
        if index < self.data.len() {
            Some((self.head + index) % self.data.len())
        } else {
            None
        }
    }
}
impl<T: Copy> Index<usize> for ScrollingBuffer<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        let len = self.data.len();
        assert!(index < len, "index {index} out of range for buffer of {len}");
        &self.data[(self.head + index) % len]
    }
}
