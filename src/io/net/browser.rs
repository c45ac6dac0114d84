use tracing::debug;
use tracing::warn;

/// Best effort: ask the desktop to open `url`.  Runs off the event loop and
/// never fails the caller; a machine without a browser only gets a warning.
pub fn open_in_background(url: String) {
    tokio::task::spawn_blocking(move || match open::that(&url) {
        Ok(()) => debug!("opened a browser at {url}"),
        Err(e) => warn!("can not open a browser at {url}: {e}"),
    });
}
