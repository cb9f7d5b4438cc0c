/// Cursor over a fixed number of steps. Moving past either end is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    total: usize,
}

impl Navigator {
    /// `total` is clamped to at least one step.
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn can_next(&self) -> bool {
        self.current + 1 < self.total
    }

    pub fn can_prev(&self) -> bool {
        self.current > 0
    }

    /// Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.can_next() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Returns whether the cursor moved.
    pub fn prev(&mut self) -> bool {
        if self.can_prev() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let nav = Navigator::new(5);
        assert_eq!(nav.current(), 0);
        assert!(!nav.can_prev());
        assert!(nav.can_next());
    }

    #[test]
    fn test_next_saturates_at_last_step() {
        for i in 0..8 {
            let mut nav = Navigator::new(5);
            for _ in 0..i {
                nav.next();
            }
            assert_eq!(nav.current(), i.min(4));
        }
    }

    #[test]
    fn test_prev_saturates_at_first_step() {
        let mut nav = Navigator::new(5);
        while nav.next() {}
        for i in 0..8 {
            let mut n = nav;
            for _ in 0..i {
                n.prev();
            }
            assert_eq!(n.current(), 4usize.saturating_sub(i));
        }
    }

    #[test]
    fn test_boundary_moves_report_no_change() {
        let mut nav = Navigator::new(2);
        assert!(!nav.prev());
        assert!(nav.next());
        assert!(!nav.next());
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn test_single_step_never_moves() {
        let mut nav = Navigator::new(1);
        assert!(!nav.next());
        assert!(!nav.prev());
        assert_eq!(nav.progress(), 1.0);
    }
}
