pub mod state;

pub fn increment(x: usize, len: usize, wrap: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if x >= len - 1 {
        if wrap { 0 } else { len - 1 }
    } else {
        x + 1
    }
}

pub fn decrement(x: usize, len: usize, wrap: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if x == 0 {
        if wrap { len - 1 } else { 0 }
    } else {
        x - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_wraps_only_when_asked() {
        assert_eq!(increment(2, 3, true), 0);
        assert_eq!(increment(2, 3, false), 2);
        assert_eq!(increment(0, 3, false), 1);
    }

    #[test]
    fn decrement_wraps_only_when_asked() {
        assert_eq!(decrement(0, 3, true), 2);
        assert_eq!(decrement(0, 3, false), 0);
        assert_eq!(decrement(2, 3, true), 1);
    }

    #[test]
    fn empty_lists_stay_at_zero() {
        assert_eq!(increment(0, 0, true), 0);
        assert_eq!(decrement(0, 0, true), 0);
    }
}
