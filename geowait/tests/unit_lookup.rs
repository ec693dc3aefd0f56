use geowait::table::ScaleTable;
use geowait::{lookup, DomainError, FindError};

fn ramp(len: usize) -> ScaleTable {
    ScaleTable::from_values((0..len).map(|i| 0.9 - 0.003 * i as f32).collect())
}

#[test]
fn grid_points_return_exact_entries() {
    let table = ramp(256);
    for (i, &v) in table.values().iter().enumerate() {
        let t = 10 * (i as i64 + 1);
        assert_eq!(lookup(t, &table).unwrap(), v as f64, "t={}", t);
    }
}

#[test]
fn between_grid_points_stays_within_neighbours() {
    let table = ScaleTable::from_values(vec![0.2, 0.6, 0.1]);
    for low in 0..2 {
        let a = table.values()[low] as f64;
        let b = table.values()[low + 1] as f64;
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let start = 10 * (low as i64 + 1);
        for t in start + 1..start + 10 {
            let s = lookup(t, &table).unwrap();
            assert!(s >= lo && s <= hi, "t={} s={}", t, s);
        }
    }
}

#[test]
fn fraction_comes_from_remainder() {
    let table = ScaleTable::from_values(vec![0.2, 0.4]);
    let s = lookup(13, &table).unwrap();
    let expected = 0.2f32 as f64 + 0.3 * (0.4f32 as f64 - 0.2f32 as f64);
    assert!((s - expected).abs() < 1e-12);
}

#[test]
fn early_queries_saturate_to_first_entry() {
    let table = ramp(256);
    let first = lookup(10, &table).unwrap();
    for t in 0..10 {
        assert_eq!(lookup(t, &table).unwrap(), first);
    }
    assert_eq!(lookup(5, &table).unwrap(), table.values()[0] as f64);
}

#[test]
fn late_queries_saturate_to_last_entry() {
    let table = ramp(256);
    let last = table.values()[255] as f64;
    assert_eq!(lookup(2560, &table).unwrap(), last);
    assert_eq!(lookup(2565, &table).unwrap(), last);
    assert_eq!(lookup(1_000_000, &table).unwrap(), last);
}

#[test]
fn boundary_follows_table_length() {
    let table = ScaleTable::from_values(vec![0.5, 0.45]);
    assert_eq!(lookup(25, &table).unwrap(), 0.45f32 as f64);
    assert_eq!(lookup(2565, &table).unwrap(), 0.45f32 as f64);
}

#[test]
fn single_entry_table() {
    let table = ScaleTable::from_values(vec![0.3]);
    assert_eq!(lookup(0, &table).unwrap(), 0.3f32 as f64);
    assert_eq!(lookup(10, &table).unwrap(), 0.3f32 as f64);
    assert_eq!(lookup(99, &table).unwrap(), 0.3f32 as f64);
}

#[test]
fn empty_table_is_a_domain_error() {
    let table = ScaleTable::from_values(vec![]);
    let err = lookup(20, &table).unwrap_err();
    assert!(err.is_domain());
    assert!(matches!(err, FindError::Domain(DomainError::EmptyTable)));
}

#[test]
fn scale_at_matches_lookup() {
    let table = ramp(10);
    assert_eq!(table.scale_at(47).unwrap(), lookup(47, &table).unwrap());
}
