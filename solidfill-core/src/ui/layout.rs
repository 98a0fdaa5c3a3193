//! Screen layout helpers

/// Left edge that centers an object of `width` within `total_width`
pub fn center(width: u8, total_width: u8) -> u8 {
    total_width.saturating_sub(width) / 2
}

/// Left edge of object `num` of `total` spread evenly across `total_width`
///
/// Each object sits centered in its own segment of `total_width / total`.
pub fn distribute(num: u8, total: u8, width: u8, total_width: u8) -> u8 {
    if total == 0 {
        return 0;
    }
    let segment = u32::from(total_width / total);
    let inset = segment.abs_diff(u32::from(width)) / 2;
    (inset + segment * u32::from(num)).min(u32::from(u8::MAX)) as u8
}
