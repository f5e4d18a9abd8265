/// Page a result set.
///
/// `page` is 1-based; values `<= 0` are treated as 1. `page_size <= 0`
/// means "return everything", still capped by `max_page_size` when one is
/// configured.
pub fn paginate<T>(
    items: Vec<T>,
    page: i64,
    page_size: i64,
    max_page_size: Option<i64>,
) -> Vec<T> {
    let page = page.max(1);
    let max = max_page_size.filter(|m| *m > 0);

    let effective = if page_size <= 0 {
        match max {
            Some(m) => m,
            None => return items,
        }
    } else {
        match max {
            Some(m) => page_size.min(m),
            None => page_size,
        }
    };

    let skip = (page - 1).saturating_mul(effective) as usize;
    items
        .into_iter()
        .skip(skip)
        .take(effective as usize)
        .collect()
}
