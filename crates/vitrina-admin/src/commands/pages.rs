//! # Page Commands
//!
//! Editing of the informational pages every store starts with.

use tracing::debug;

use vitrina_core::{LocalizedText, Page};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn list_pages(app: &AppState, store_id: &str) -> ApiResult<Vec<Page>> {
    Ok(app.db.tenant(store_id).pages().list().await?)
}

pub async fn get_page(app: &AppState, store_id: &str, slug: &str) -> ApiResult<Page> {
    app.db
        .tenant(store_id)
        .pages()
        .get_by_slug(slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Page", slug))
}

/// Replaces a page's title and body, returning the stored page.
pub async fn update_page(
    app: &AppState,
    store_id: &str,
    slug: &str,
    title: LocalizedText,
    content: LocalizedText,
) -> ApiResult<Page> {
    let page = get_page(app, store_id, slug).await?;
    app.db
        .tenant(store_id)
        .pages()
        .update_content(&page.id, &title, &content)
        .await?;
    debug!(store_id = %store_id, slug = %slug, "update_page command");

    get_page(app, store_id, slug).await
}

pub async fn set_page_published(
    app: &AppState,
    store_id: &str,
    slug: &str,
    is_published: bool,
) -> ApiResult<Page> {
    let page = get_page(app, store_id, slug).await?;
    app.db
        .tenant(store_id)
        .pages()
        .set_published(&page.id, is_published)
        .await?;

    get_page(app, store_id, slug).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::app_with_store;
    use crate::error::ErrorCode;
    use vitrina_core::PageKind;

    #[tokio::test]
    async fn test_new_store_has_default_pages() {
        let (app, store) = app_with_store().await;

        let pages = list_pages(&app, &store.id).await.unwrap();
        assert_eq!(pages.len(), PageKind::DEFAULTS.len());
        assert!(pages.windows(2).all(|w| w[0].order < w[1].order));
    }

    #[tokio::test]
    async fn test_edit_and_unpublish() {
        let (app, store) = app_with_store().await;

        let page = update_page(
            &app,
            &store.id,
            "about",
            LocalizedText::new("Quiénes somos", "Who we are"),
            LocalizedText::new("Atendemos desde 1998.", "Open since 1998."),
        )
        .await
        .unwrap();
        assert_eq!(page.title.en, "Who we are");

        let page = set_page_published(&app, &store.id, "about", false).await.unwrap();
        assert!(!page.is_published);

        let err = update_page(
            &app,
            &store.id,
            "about",
            LocalizedText::new("  ", ""),
            LocalizedText::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_unknown_slug() {
        let (app, store) = app_with_store().await;
        let err = get_page(&app, &store.id, "blog").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
