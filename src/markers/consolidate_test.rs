#[cfg(test)]
mod tests {
    use crate::markers::{
        BBox, MarkerRecord, PixelSize, Point, Polygon, ViewportMetrics, ViewportScale,
        consolidate, consolidate_if_needed,
    };
    use quickcheck::QuickCheck;

    /// 1 degree square viewport, 800px high, 40px icons: icon footprint 0.05 degrees
    fn scale() -> ViewportScale {
        ViewportMetrics::new(
            BBox::new(0.0, 0.0, 1.0, 1.0),
            PixelSize { x: 800.0, y: 800.0 },
            10.0,
        )
        .scale(40.0)
    }

    fn cluster(id: &str, lat: f64, lng: f64, points: usize) -> MarkerRecord {
        let half = 0.005;
        MarkerRecord::cluster(id, points, BBox::new(lng - half, lat - half, lng + half, lat + half))
    }

    fn total_points(markers: &[MarkerRecord]) -> usize {
        markers.iter().map(|m| m.number_of_points).sum()
    }

    #[test]
    fn test_merges_adjacent_clusters() {
        let input = vec![
            cluster("a", 0.5, 0.5, 3),
            cluster("b", 0.52, 0.52, 4),
            cluster("c", 0.9, 0.9, 2),
        ];
        let output = consolidate(&input, &scale(), 0.25);

        assert_eq!(output.len(), 2);
        assert_eq!(output[0].id.as_str(), "a~1");
        assert_eq!(output[0].number_of_points, 7);
        let bbox = output[0].bbox().unwrap();
        assert!((bbox.west - 0.495).abs() < 1e-12);
        assert!((bbox.north - 0.525).abs() < 1e-12);
        assert!((output[0].position.lat - bbox.center().lat).abs() < 1e-12);
        assert!((output[0].position.lng - bbox.center().lng).abs() < 1e-12);
        assert_eq!(output[1], input[2]);
    }

    #[test]
    fn test_merge_keeps_first_status() {
        let input = vec![
            cluster("a", 0.5, 0.5, 3).with_status("open"),
            cluster("b", 0.52, 0.52, 4).with_status("done"),
        ];
        let output = consolidate(&input, &scale(), 0.25);

        assert_eq!(output.len(), 1);
        assert_eq!(output[0].status_meta.as_deref(), Some("open"));
    }

    #[test]
    fn test_respects_max_extent() {
        let input = vec![cluster("a", 0.5, 0.5, 3), cluster("b", 0.52, 0.52, 4)];
        let output = consolidate(&input, &scale(), 0.02);
        assert_eq!(output, input);
    }

    #[test]
    fn test_single_tasks_are_never_merged() {
        let input = vec![
            cluster("a", 0.5, 0.5, 3),
            MarkerRecord::task("t", Point::new(0.5, 0.5)),
            MarkerRecord::task("u", Point::new(0.5, 0.5)),
        ];
        let output = consolidate(&input, &scale(), 0.25);
        assert_eq!(output, input);
    }

    #[test]
    fn test_bad_geometry_leaves_pair_unmerged() {
        let mut broken = cluster("b", 0.51, 0.51, 4);
        broken.bounding_geometry = Some(Polygon(vec![Point::new(f64::NAN, 0.51)]));
        let input = vec![cluster("a", 0.5, 0.5, 3), broken, cluster("c", 0.52, 0.5, 2)];

        let output = consolidate(&input, &scale(), 0.25);
        assert_eq!(output.len(), 2);
        assert_eq!(total_points(&output), 9);
        assert!(output.iter().any(|m| m.id.as_str() == "b"));
        assert!(output.iter().any(|m| m.id.as_str() == "a~1"));
    }

    #[test]
    fn test_thirty_clusters_in_one_degree() {
        // 15 pairs, each pair 0.02 degrees apart
        let input: Vec<MarkerRecord> = (0..30)
            .map(|i| {
                let pair = i / 2;
                let lat = 0.1 + (pair / 5) as f64 * 0.3;
                let lng = 0.1 + (pair % 5) as f64 * 0.2 + (i % 2) as f64 * 0.02;
                cluster(&format!("c{i}"), lat, lng, 2 + i % 3)
            })
            .collect();

        let output = consolidate_if_needed(&input, &scale(), true);
        assert!(output.len() < input.len());
        assert_eq!(output.len(), 15);
        assert_eq!(total_points(&output), total_points(&input));
    }

    #[test]
    fn test_not_in_cluster_mode_returns_input() {
        let input = vec![cluster("a", 0.5, 0.5, 3), cluster("b", 0.51, 0.51, 4)];
        assert_eq!(consolidate_if_needed(&input, &scale(), false), input);
    }

    fn arbitrary_markers(seeds: &[(u8, u8, u8)]) -> Vec<MarkerRecord> {
        seeds
            .iter()
            .enumerate()
            .map(|(i, &(x, y, z))| {
                let lat = x as f64 / 255.0;
                let lng = y as f64 / 255.0;
                if z % 5 == 0 {
                    MarkerRecord::task(format!("t{i}").as_str(), Point::new(lat, lng))
                } else {
                    cluster(&format!("c{i}"), lat, lng, 2 + z as usize % 20)
                }
            })
            .collect()
    }

    #[test]
    fn test_point_count_is_conserved() {
        fn prop(seeds: Vec<(u8, u8, u8)>) -> bool {
            let input = arbitrary_markers(&seeds);
            let output = consolidate(&input, &scale(), 0.25);
            output.len() <= input.len() && total_points(&output) == total_points(&input)
        }
        QuickCheck::new().quickcheck(prop as fn(Vec<(u8, u8, u8)>) -> bool);
    }

    #[test]
    fn test_merged_extent_is_bounded() {
        fn prop(seeds: Vec<(u8, u8, u8)>) -> bool {
            let max_extent = scale().max_cluster_extent_deg();
            let output = consolidate(&arbitrary_markers(&seeds), &scale(), max_extent);
            output.iter().all(|m| {
                let bbox = m.bbox().unwrap();
                bbox.width() <= max_extent && bbox.height() <= max_extent
            })
        }
        QuickCheck::new().quickcheck(prop as fn(Vec<(u8, u8, u8)>) -> bool);
    }
}
