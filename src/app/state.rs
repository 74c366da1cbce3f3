// Grouped app state, split out of app.rs.

use eframe::egui;
use std::collections::{HashMap, HashSet};
use std::sync::mpsc;

use super::fetch::PhotoMsg;
use crate::feed::{FeedError, FeedMsg, PostId};

/// Feed fetch wiring: results arrive tagged with a request id so stale
/// responses can be dropped.
pub struct NetState {
    pub counter: u64,
    pub loading: bool,
    pub tx: mpsc::Sender<(u64, Result<FeedMsg, FeedError>)>,
    pub rx: mpsc::Receiver<(u64, Result<FeedMsg, FeedError>)>,
    pub last_result: Option<FeedMsg>,
    pub last_error: Option<String>,
}

impl NetState {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            counter: 0,
            loading: false,
            tx,
            rx,
            last_result: None,
            last_error: None,
        }
    }
}

/// Photo textures keyed by post id, plus in-flight download dedupe.
pub struct ImagesState {
    pub photos: HashMap<PostId, egui::TextureHandle>,
    pub photos_loading: HashSet<PostId>,
    pub photo_tx: mpsc::Sender<PhotoMsg>,
    pub photo_rx: mpsc::Receiver<PhotoMsg>,
}

impl ImagesState {
    pub fn new() -> Self {
        let (photo_tx, photo_rx) = mpsc::channel();
        Self {
            photos: HashMap::new(),
            photos_loading: HashSet::new(),
            photo_tx,
            photo_rx,
        }
    }
}
