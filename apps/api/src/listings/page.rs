use serde::Serialize;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<T>,
}

/// Cuts one page out of `items`. The requested page is clamped into
/// `1..=total_pages`, and there is always at least one (possibly empty) page.
pub fn paginate<T: Clone>(items: &[T], requested: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let page = requested.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());

    Page {
        page,
        total_pages,
        total_items: items.len(),
        items: items[start..end].to_vec(),
    }
}
