use serde::{Deserialize, Serialize};

/// One row of the Brazilian ring size chart.
/// Diameters are internal diameters in millimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub size: u32,
    pub diameter: f64,
}

const fn entry(size: u32, diameter: f64) -> ReferenceEntry {
    ReferenceEntry { size, diameter }
}

/// Brazilian sizes ("aro") 1..=35. Size n has an internal circumference of
/// (40 + n) mm; diameters are rounded to 0.1 mm.
/// Ordered by increasing diameter.
pub static RING_SIZE_CHART: &[ReferenceEntry] = &[
    entry(1, 13.1),
    entry(2, 13.4),
    entry(3, 13.7),
    entry(4, 14.0),
    entry(5, 14.3),
    entry(6, 14.6),
    entry(7, 15.0),
    entry(8, 15.3),
    entry(9, 15.6),
    entry(10, 15.9),
    entry(11, 16.2),
    entry(12, 16.6),
    entry(13, 16.9),
    entry(14, 17.2),
    entry(15, 17.5),
    entry(16, 17.8),
    entry(17, 18.1),
    entry(18, 18.5),
    entry(19, 18.8),
    entry(20, 19.1),
    entry(21, 19.4),
    entry(22, 19.7),
    entry(23, 20.1),
    entry(24, 20.4),
    entry(25, 20.7),
    entry(26, 21.0),
    entry(27, 21.3),
    entry(28, 21.6),
    entry(29, 22.0),
    entry(30, 22.3),
    entry(31, 22.6),
    entry(32, 22.9),
    entry(33, 23.2),
    entry(34, 23.6),
    entry(35, 23.9),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_is_strictly_increasing() {
        for pair in RING_SIZE_CHART.windows(2) {
            assert!(pair[0].size < pair[1].size);
            assert!(pair[0].diameter < pair[1].diameter);
        }
    }

    #[test]
    fn chart_follows_circumference_rule() {
        for e in RING_SIZE_CHART {
            let exact = (40.0 + e.size as f64) / std::f64::consts::PI;
            assert!((exact - e.diameter).abs() <= 0.05 + 1e-9, "size {}", e.size);
        }
    }

    #[test]
    fn entries_serialize_as_plain_objects() {
        let json = serde_json::to_string(&RING_SIZE_CHART[0]).unwrap();
        assert_eq!(json, r#"{"size":1,"diameter":13.1}"#);
    }
}
