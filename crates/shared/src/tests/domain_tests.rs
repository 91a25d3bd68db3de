use super::*;

#[test]
fn derives_block_group_range_from_county_geoid() {
    let range = Geoid("36001".into()).block_group_range().expect("range");
    assert_eq!(range.baseline, 360_010_000_000);
    assert_eq!(range.next, 360_020_000_000);
}

#[test]
fn preserves_leading_zeros_in_range_derivation() {
    let range = Geoid("01001".into()).block_group_range().expect("range");
    assert_eq!(range.baseline, 10_010_000_000);
    assert_eq!(range.next - range.baseline, BLOCK_GROUPS_PER_COUNTY);
}

#[test]
fn rejects_malformed_geoids() {
    assert!(Geoid("3601".into()).block_group_range().is_none());
    assert!(Geoid("360011".into()).block_group_range().is_none());
    assert!(Geoid("36A01".into()).block_group_range().is_none());
    assert!(Geoid("".into()).block_group_range().is_none());
}

#[test]
fn range_is_half_open() {
    let range = Geoid("36001".into()).block_group_range().expect("range");
    assert!(range.contains(range.baseline));
    assert!(range.contains(range.next - 1));
    assert!(!range.contains(range.next));
    assert!(!range.contains(range.baseline - 1));
}
