// Settings facade: persistence store + the settings window + small OS helpers.

mod store;
mod ui;

pub use store::{
    api_base, hide_post, load_settings_from_disk, set_photos_per_row, unhide_all_posts,
    with_settings, AppSettings, APP_SETTINGS,
};
pub use ui::{draw_settings_viewport, open_settings};

/// Open a URL in the system default browser.
pub fn open_in_browser(url: &str) {
    #[cfg(target_os = "windows")]
    let res = std::process::Command::new("cmd")
        .args(["/C", "start", "", url])
        .spawn();
    #[cfg(target_os = "macos")]
    let res = std::process::Command::new("open").arg(url).spawn();
    #[cfg(all(unix, not(target_os = "macos")))]
    let res = std::process::Command::new("xdg-open").arg(url).spawn();

    if let Err(e) = res {
        log::warn!("Failed to open browser for {}: {}", url, e);
    }
}
