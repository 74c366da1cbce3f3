// Opportunistic on-disk photo cache: decoded photos are persisted as PNG
// under cache/<post_id>/photo.png so a restart does not re-download the feed.

use lazy_static::lazy_static;
use std::path::PathBuf;
use tokio::sync::Semaphore;

use crate::app::settings::APP_SETTINGS;
use crate::feed::PostId;

lazy_static! {
    static ref CACHE_CONCURRENCY: Semaphore = Semaphore::new(3);
}

pub fn photo_cache_path(post_id: &PostId) -> PathBuf {
    let base = { APP_SETTINGS.read().unwrap().cache_dir.clone() };
    base.join(post_id.as_str()).join("photo.png")
}

async fn write_png_file(path: &PathBuf, w: usize, h: usize, rgba: Vec<u8>) -> Result<(), String> {
    // Offload PNG encoding + file IO to the blocking thread pool
    let path2 = path.clone();
    tokio::task::spawn_blocking(move || {
        use image::codecs::png::PngEncoder;
        use image::ColorType;
        use image::ImageEncoder;

        let mut buf: Vec<u8> = Vec::new();
        {
            let encoder = PngEncoder::new(&mut buf);
            encoder
                .write_image(&rgba, w as u32, h as u32, ColorType::Rgba8.into())
                .map_err(|e| format!("png encode error: {}", e))?;
        }
        std::fs::write(&path2, buf).map_err(|e| format!("write error: {}", e))?;
        Ok::<(), String>(())
    })
    .await
    .map_err(|e| format!("join error: {}", e))?
}

/// Persist an already-decoded photo in the background (no extra HTTP).
/// No-op when caching is disabled or the file already exists; the pixel
/// buffer is only copied once a write is actually going to happen.
pub fn maybe_save_photo_png(post_id: &PostId, w: usize, h: usize, rgba: &[u8]) {
    let enabled = { APP_SETTINGS.read().unwrap().cache_photos };
    if !enabled {
        return;
    }
    let path = photo_cache_path(post_id);
    if std::fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
        return;
    }
    let dir = match path.parent() {
        Some(d) => d.to_path_buf(),
        None => return,
    };
    let id = post_id.clone();
    let rgba = rgba.to_vec();
    crate::app::rt().spawn(async move {
        let _permit = CACHE_CONCURRENCY.acquire().await.unwrap();
        let _ = tokio::fs::create_dir_all(&dir).await;
        if let Err(e) = write_png_file(&path, w, h, rgba).await {
            log::warn!(
                "cache: write photo failed id={} path={}: {}",
                id.as_str(),
                path.to_string_lossy(),
                e
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn save_is_a_noop_when_caching_disabled() {
        {
            let mut s = APP_SETTINGS.write().unwrap();
            s.cache_photos = false;
            s.cache_dir = PathBuf::from("test_cache_disabled");
        }
        let id = PostId("noop".to_string());
        maybe_save_photo_png(&id, 1, 1, &[0, 0, 0, 255]);
        assert!(!Path::new("test_cache_disabled").exists());
    }
}
