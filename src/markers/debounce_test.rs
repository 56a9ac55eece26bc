#[cfg(test)]
mod tests {
    use crate::markers::{DEFAULT_QUIESCENCE, Debouncer};
    use std::time::{Duration, Instant};

    #[test]
    fn test_emits_last_value_after_quiet_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();

        debouncer.push(1, start);
        debouncer.push(2, start + Duration::from_millis(200));
        debouncer.push(3, start + Duration::from_millis(400));

        assert_eq!(debouncer.poll(start + Duration::from_millis(800)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(400) + DEFAULT_QUIESCENCE),
            Some(3)
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_cancel_drops_pending_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        debouncer.push("bounds", start);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_poll_before_push_is_empty() {
        let mut debouncer: Debouncer<u8> = Debouncer::default();
        assert_eq!(debouncer.poll(Instant::now()), None);
    }
}
