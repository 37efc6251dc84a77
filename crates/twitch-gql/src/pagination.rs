//! Cursor pagination driver.

use std::future::Future;

use crate::error::GqlError;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<T> {
    /// Items in the page.
    pub items: Vec<T>,
    /// Cursor of the last edge in the page, if any.
    pub cursor: Option<String>,
    /// Whether the server reports another page.
    pub has_next_page: bool,
}

/// Walk a cursor-paginated listing to exhaustion, starting from the
/// empty-string cursor.
///
/// Each call to `fetch_page` receives the cursor to resume from; the walk
/// advances to the last edge's cursor and stops once the server reports no
/// next page. Any page failure aborts the whole walk with that error, so a
/// truncated listing is never presented as complete.
pub async fn paginate_cursor<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, GqlError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>, GqlError>>,
{
    let mut cursor = String::new();
    let mut out = Vec::new();
    loop {
        let page = fetch_page(cursor.clone()).await?;
        out.extend(page.items);
        if !page.has_next_page {
            break;
        }
        match page.cursor {
            Some(last) => cursor = last,
            None => break,
        }
    }
    Ok(out)
}
