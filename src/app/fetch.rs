use eframe::egui;
use std::collections::{HashMap, HashSet};

use super::rt;
use crate::feed::{Post, PostId};

/// Messages produced by background photo downloads.
pub enum PhotoMsg {
    Ok {
        post_id: PostId,
        w: usize,
        h: usize,
        rgba: Vec<u8>,
    },
    Err {
        post_id: PostId,
    },
}

impl super::PuppygramApp {
    /// Start an async fetch of the current feed page.
    pub(super) fn start_fetch(&mut self, ctx: &egui::Context) {
        // Restarting while one is in-flight is fine; results are deduped by
        // request id.
        self.net.loading = true;
        self.net.last_error = None;
        self.net.last_result = None;
        ctx.request_repaint();

        self.net.counter = self.net.counter.wrapping_add(1);
        let req_id = self.net.counter;

        let tx = self.net.tx.clone();
        let ctx2 = ctx.clone();
        let page = self.page;
        let query = crate::feed::FeedQuery::default().with_author(self.author_query.trim());

        rt().spawn(async move {
            let res = crate::feed::fetch_feed_page(page, &query).await;
            if let Err(err) = &res {
                log::error!("Error fetching feed page {page}: {err}");
            }
            let _ = tx.send((req_id, res));
            ctx2.request_repaint();
        });
    }

    /// Schedule background photo downloads for newly arrived posts.
    /// Idempotent: each post id is scheduled at most once.
    pub(super) fn schedule_photo_downloads(&mut self, ctx: &egui::Context) {
        let Some(msg) = &self.net.last_result else {
            return;
        };
        for p in &msg.data {
            if p.photo.is_empty()
                || self.images.photos.contains_key(&p.id)
                || self.images.photos_loading.contains(&p.id)
            {
                continue;
            }
            self.images.photos_loading.insert(p.id.clone());

            let post_id = p.id.clone();
            let url = crate::feed::normalize_url(&super::settings::api_base(), &p.photo);
            let tx = self.images.photo_tx.clone();
            let ctx2 = ctx.clone();
            let cache_path = super::cache::photo_cache_path(&post_id);

            log::debug!("photo schedule: id={} url={}", post_id.as_str(), url);
            rt().spawn(async move {
                // Try the on-disk cache before any HTTP.
                let mut served_from_cache = false;
                if tokio::fs::metadata(&cache_path).await.is_ok() {
                    match tokio::task::spawn_blocking(
                        move || -> Result<(usize, usize, Vec<u8>), String> {
                            let bytes = std::fs::read(&cache_path)
                                .map_err(|e| format!("read cache error: {}", e))?;
                            let img = image::load_from_memory(&bytes)
                                .map_err(|e| format!("decode cache error: {}", e))?;
                            let rgba = img.to_rgba8();
                            let (w, h) = rgba.dimensions();
                            Ok((w as usize, h as usize, rgba.into_vec()))
                        },
                    )
                    .await
                    {
                        Ok(Ok((w, h, rgba))) => {
                            log::debug!("photo cache hit: id={}", post_id.as_str());
                            let _ = tx.send(PhotoMsg::Ok {
                                post_id: post_id.clone(),
                                w,
                                h,
                                rgba,
                            });
                            served_from_cache = true;
                        }
                        Ok(Err(e)) => {
                            log::warn!("photo cache decode failed: id={} err={}", post_id.as_str(), e);
                        }
                        Err(e) => {
                            log::warn!("photo cache task join failed: id={} err={}", post_id.as_str(), e);
                        }
                    }
                }

                if !served_from_cache {
                    let msg = match crate::feed::fetch_photo(&url).await {
                        Ok((w, h, rgba)) => PhotoMsg::Ok {
                            post_id: post_id.clone(),
                            w,
                            h,
                            rgba,
                        },
                        Err(err) => {
                            log::warn!(
                                "photo fetch failed: id={} err={} url={}",
                                post_id.as_str(),
                                err,
                                url
                            );
                            PhotoMsg::Err { post_id }
                        }
                    };
                    let _ = tx.send(msg);
                }
                ctx2.request_repaint();
            });
        }
    }

    /// Poll incoming async messages (feed pages, photos) and update state.
    pub(super) fn poll_incoming(&mut self, ctx: &egui::Context) {
        while let Ok((id, res)) = self.net.rx.try_recv() {
            if id != self.net.counter {
                // Stale request superseded by a newer one.
                continue;
            }
            self.net.loading = false;
            match res {
                Ok(msg) => {
                    log::info!(
                        "feed page {} received: {} posts",
                        msg.pagination.page,
                        msg.data.len()
                    );
                    self.net.last_error = None;
                    retain_displayed(
                        &mut self.images.photos,
                        &mut self.images.photos_loading,
                        &msg.data,
                    );
                    self.net.last_result = Some(msg);
                    self.schedule_photo_downloads(ctx);
                }
                Err(e) => {
                    self.net.last_result = None;
                    self.net.last_error = Some(e.to_string());
                }
            }
        }

        while let Ok(msg) = self.images.photo_rx.try_recv() {
            match msg {
                PhotoMsg::Ok { post_id, w, h, rgba } => {
                    self.images.photos_loading.remove(&post_id);
                    let displayed = self
                        .net
                        .last_result
                        .as_ref()
                        .is_some_and(|m| m.data.iter().any(|p| p.id == post_id));
                    if !displayed {
                        // The page changed while this photo was in flight.
                        continue;
                    }
                    // Opportunistic cache save (if enabled)
                    super::cache::maybe_save_photo_png(&post_id, w, h, &rgba);
                    let image = egui::ColorImage::from_rgba_unmultiplied([w, h], &rgba);
                    let tex = ctx.load_texture(
                        format!("photo_{}", post_id.as_str()),
                        image,
                        egui::TextureOptions::default(),
                    );
                    self.images.photos.insert(post_id, tex);
                }
                PhotoMsg::Err { post_id } => {
                    self.images.photos_loading.remove(&post_id);
                }
            }
        }
    }
}

/// Drop cached textures and in-flight markers for posts that are no longer
/// on the current page, so long sessions do not accumulate textures.
fn retain_displayed<T>(
    photos: &mut HashMap<PostId, T>,
    loading: &mut HashSet<PostId>,
    posts: &[Post],
) {
    photos.retain(|id, _| posts.iter().any(|p| p.id == *id));
    loading.retain(|id| posts.iter().any(|p| p.id == *id));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str) -> Post {
        serde_json::from_str(&format!(r#"{{"_id":"{id}"}}"#)).unwrap()
    }

    #[test]
    fn page_change_evicts_stale_photo_state() {
        let mut photos: HashMap<PostId, ()> = HashMap::new();
        photos.insert(PostId("a".into()), ());
        photos.insert(PostId("b".into()), ());
        let mut loading: HashSet<PostId> = HashSet::new();
        loading.insert(PostId("c".into()));

        let page = vec![post("b")];
        retain_displayed(&mut photos, &mut loading, &page);

        assert_eq!(photos.len(), 1);
        assert!(photos.contains_key(&PostId("b".into())));
        assert!(loading.is_empty());
    }

    #[test]
    fn retained_ids_survive_a_refetch_of_the_same_page() {
        let mut photos: HashMap<PostId, ()> = HashMap::new();
        photos.insert(PostId("a".into()), ());
        let mut loading: HashSet<PostId> = HashSet::new();

        let page = vec![post("a"), post("b")];
        retain_displayed(&mut photos, &mut loading, &page);

        assert!(photos.contains_key(&PostId("a".into())));
    }
}
