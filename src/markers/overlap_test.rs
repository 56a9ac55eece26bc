#[cfg(test)]
mod tests {
    use crate::markers::{MarkerRecord, Point, distance_degrees, find_overlapping};
    use quickcheck::QuickCheck;

    fn ids(found: &[&MarkerRecord]) -> Vec<String> {
        found.iter().map(|m| m.id.to_string()).collect()
    }

    #[test]
    fn test_groups_close_markers_only() {
        let markers = vec![
            MarkerRecord::task("a", Point::new(10.0, 10.0)),
            MarkerRecord::task("b", Point::new(10.0001, 10.0001)),
            MarkerRecord::task("c", Point::new(20.0, 20.0)),
        ];

        assert_eq!(ids(&find_overlapping(&markers[0], &markers, 0.001)), ["b"]);
        assert_eq!(ids(&find_overlapping(&markers[1], &markers, 0.001)), ["a"]);
        assert!(find_overlapping(&markers[2], &markers, 0.001).is_empty());
    }

    #[test]
    fn test_threshold_distance_counts_as_overlap() {
        let a = MarkerRecord::task("a", Point::new(0.0, 0.0));
        let b = MarkerRecord::task("b", Point::new(0.0, 0.25));
        let gap = distance_degrees(&a.position, &b.position);
        let candidates = vec![b];

        assert_eq!(find_overlapping(&a, &candidates, gap * 2.0).len(), 1);
        assert!(find_overlapping(&a, &candidates, gap * 1.999).is_empty());
    }

    #[test]
    fn test_compares_true_positions_of_spidered_markers() {
        let a = MarkerRecord::task("a", Point::new(5.0, 5.0));
        let mut b = MarkerRecord::task("b", Point::new(5.5, 5.5));
        b.original_position = Some(Point::new(5.0, 5.0));
        let candidates = vec![a.clone(), b];

        assert_eq!(ids(&find_overlapping(&a, &candidates, 0.001)), ["b"]);
    }

    #[test]
    fn test_overlap_is_symmetric() {
        fn prop(a: (i16, i16), b: (i16, i16)) -> bool {
            let ma = MarkerRecord::task(
                "a",
                Point::new(a.0 as f64 * 1e-5, a.1 as f64 * 1e-5),
            );
            let mb = MarkerRecord::task(
                "b",
                Point::new(b.0 as f64 * 1e-5, b.1 as f64 * 1e-5),
            );
            let both = vec![ma.clone(), mb.clone()];

            let a_sees_b = find_overlapping(&ma, &both, 0.01).len() == 1;
            let b_sees_a = find_overlapping(&mb, &both, 0.01).len() == 1;
            a_sees_b == b_sees_a
        }
        QuickCheck::new().quickcheck(prop as fn((i16, i16), (i16, i16)) -> bool);
    }
}
