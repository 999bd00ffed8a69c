use async_trait::async_trait;
use tracing::{debug, warn};

use crate::db::image_store::{ImageStore, internal_image_id};

/// Called by the course and event stores whenever an owner stops referring to
/// an image, either because `image_url` was replaced or the owner was deleted
/// (`new_ref` is then `None`).
///
/// Implementations must not fail the caller: errors are logged and dropped.
#[async_trait]
pub trait ImageOwnerCleanup: Send + Sync {
    async fn on_replaced(&self, old_ref: Option<&str>, new_ref: Option<&str>);
}

/// Deletes the previous image when it lived in our own [`ImageStore`].
/// External URLs are left alone.
pub struct ImageCleanup {
    images: ImageStore,
}

impl ImageCleanup {
    pub fn new(images: ImageStore) -> Self {
        Self { images }
    }
}

#[async_trait]
impl ImageOwnerCleanup for ImageCleanup {
    async fn on_replaced(&self, old_ref: Option<&str>, new_ref: Option<&str>) {
        let Some(old_ref) = old_ref else {
            return;
        };
        let Some(old_id) = internal_image_id(old_ref) else {
            debug!("not deleting external image {}", old_ref);
            return;
        };
        if new_ref.and_then(internal_image_id).as_deref() == Some(old_id.as_str()) {
            return;
        }

        match self.images.delete(&old_id).await {
            Ok(true) => debug!("deleted replaced image {}", old_id),
            Ok(false) => debug!("replaced image {} was already gone", old_id),
            Err(e) => warn!("failed to delete replaced image {}: {}", old_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::image_store::image_url;
    use crate::db::setup_test_db;

    #[tokio::test]
    async fn test_replacing_internal_image_deletes_it() {
        let pool = setup_test_db().await;
        let images = ImageStore::new(pool);
        let old = images.store("old.png", "image/png", b"old").await.unwrap();
        let new = images.store("new.png", "image/png", b"new").await.unwrap();
        let cleanup = ImageCleanup::new(images.clone());

        let old_url = image_url(&old);
        let new_url = image_url(&new);
        cleanup
            .on_replaced(Some(old_url.as_str()), Some(new_url.as_str()))
            .await;

        assert!(images.get_by_id(&old).await.unwrap().is_none());
        assert!(images.get_by_id(&new).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_same_reference_is_kept() {
        let pool = setup_test_db().await;
        let images = ImageStore::new(pool);
        let id = images.store("a.png", "image/png", b"a").await.unwrap();
        let cleanup = ImageCleanup::new(images.clone());

        let url = image_url(&id);
        let versioned = format!("{url}?v=2");
        cleanup.on_replaced(Some(url.as_str()), Some(url.as_str())).await;
        cleanup
            .on_replaced(Some(url.as_str()), Some(versioned.as_str()))
            .await;

        assert!(images.get_by_id(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_removed_owner_deletes_internal_image() {
        let pool = setup_test_db().await;
        let images = ImageStore::new(pool);
        let id = images.store("a.png", "image/png", b"a").await.unwrap();
        let cleanup = ImageCleanup::new(images.clone());

        let url = image_url(&id);
        cleanup.on_replaced(Some(url.as_str()), None).await;

        assert!(images.get_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_external_image_is_untouched() {
        let pool = setup_test_db().await;
        let images = ImageStore::new(pool);
        let id = images.store("a.png", "image/png", b"a").await.unwrap();
        let cleanup = ImageCleanup::new(images.clone());

        cleanup
            .on_replaced(Some("https://cdn.example.com/a.png"), None)
            .await;

        assert_eq!(images.list().await.unwrap().len(), 1);
        assert!(images.get_by_id(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_failure_is_swallowed() {
        let pool = setup_test_db().await;
        let images = ImageStore::new(pool.clone());
        let id = images.store("a.png", "image/png", b"a").await.unwrap();
        let cleanup = ImageCleanup::new(images);

        pool.close().await;

        // Must return normally even though the database is gone.
        let url = image_url(&id);
        cleanup.on_replaced(Some(url.as_str()), None).await;
    }
}
