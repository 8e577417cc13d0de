// src/pipeline/pager.rs
//! Page slicing and the compact page strip.

use serde::Serialize;
use std::fmt;

/// Analyses shown per page.
pub const ITEMS_PER_PAGE: usize = 6;

/// Pages shown on each side of the current page in the page strip.
pub const PAGE_WINDOW_DELTA: usize = 2;

/// One page worth of an ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
    /// 1-based inclusive display range.
    pub start: usize,
    pub end: usize,
}

/// Slice `items` to the 1-based `page`. Out-of-range pages yield an empty
/// slice; keeping `page` in range is the caller's job.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let count = items.len();
    let total_pages = count.div_ceil(page_size);

    let offset = page.saturating_sub(1).saturating_mul(page_size);
    let from = offset.min(count);
    let to = offset.saturating_add(page_size).min(count);

    Page {
        items: &items[from..to],
        total_pages,
        start: offset.saturating_add(1),
        end: page.saturating_mul(page_size).min(count),
    }
}

/// Entry in the rendered page strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageToken::Page(number) => write!(f, "{number}"),
            PageToken::Ellipsis => f.write_str("..."),
        }
    }
}

/// Page numbers to render: page 1, a window of `delta` pages around
/// `current`, the last page, and an ellipsis over each gap.
pub fn page_window(current: usize, total_pages: usize, delta: usize) -> Vec<PageToken> {
    let last_inner = total_pages.saturating_sub(1);

    let mut tokens = vec![PageToken::Page(1)];
    if current.saturating_sub(delta) > 2 {
        tokens.push(PageToken::Ellipsis);
    }

    let low = current.saturating_sub(delta).max(2);
    let high = current.saturating_add(delta).min(last_inner);
    tokens.extend((low..=high).map(PageToken::Page));

    if current.saturating_add(delta) < last_inner {
        tokens.push(PageToken::Ellipsis);
        tokens.push(PageToken::Page(total_pages));
    } else if total_pages > 1 {
        tokens.push(PageToken::Page(total_pages));
    }

    tokens
}
