/// Anything the working queue can order.
pub trait Weighted {
    fn weight(&self) -> usize;
}

/// Working queue for tree construction, kept sorted by descending weight.
///
/// The tail holds the lightest entries. Insertion is a linear scan, which
/// keeps tie handling exact: a new entry lands after every entry of equal or
/// greater weight.
#[derive(Debug, Clone)]
pub struct SortedQueue<T> {
    pub elements: Vec<T>,
}

impl<T> SortedQueue<T> {
    pub fn new() -> Self {
        SortedQueue { elements: vec![] }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Remove the lightest entry.
    pub fn pop_lightest(&mut self) -> Option<T> {
        self.elements.pop()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }
}

impl<T: Weighted> SortedQueue<T> {
    /// Seed from entries already in descending weight order.
    pub fn from_descending(source: Vec<T>) -> Self {
        debug_assert!(source.windows(2).all(|w| w[0].weight() >= w[1].weight()));
        SortedQueue { elements: source }
    }

    /// Insert before the first entry strictly lighter than `value`.
    pub fn insert(&mut self, value: T) {
        let weight = value.weight();
        match self.elements.iter().position(|e| e.weight() < weight) {
            Some(index) => self.elements.insert(index, value),
            None => self.elements.push(value),
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.elements
            .windows(2)
            .all(|pair| pair[0].weight() >= pair[1].weight())
    }
}

impl<T> Default for SortedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Item(usize, char);

    impl Weighted for Item {
        fn weight(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn test_insert_after_equal_weights() {
        let mut queue = SortedQueue::from_descending(vec![Item(5, 'a'), Item(3, 'b'), Item(3, 'c'), Item(1, 'd')]);
        queue.insert(Item(3, 'n'));
        let labels: String = queue.elements.iter().map(|i| i.1).collect();
        assert_eq!(labels, "abcnd");
        assert!(queue.is_sorted());
    }

    #[test]
    fn test_insert_lightest_appends() {
        let mut queue = SortedQueue::from_descending(vec![Item(4, 'a'), Item(2, 'b')]);
        queue.insert(Item(1, 'z'));
        assert_eq!(queue.pop_lightest(), Some(Item(1, 'z')));
        queue.insert(Item(9, 'h'));
        assert_eq!(queue.elements[0], Item(9, 'h'));
        assert_eq!(queue.len(), 3);
    }
}
