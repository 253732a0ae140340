/// Translates page-oriented query parameters into an offset and limit.
///
/// When both `current` and `page_size` are positive the result is the usual
/// `((current - 1) * page_size, page_size)`. Otherwise the offset is 0, and a
/// positive `page_size` still caps the result while a missing or
/// non-positive one lists everything.
pub fn to_offset_limit(current: i64, page_size: i64) -> (u64, Option<u64>) {
    if current > 0 && page_size > 0 {
        let offset = (current - 1).saturating_mul(page_size);
        return (offset as u64, Some(page_size as u64));
    }

    let limit = (page_size > 0).then_some(page_size as u64);
    (0, limit)
}
