//! Video-host URL recognition for embeds.
//!
//! Two hosts are recognized: YouTube (watch, short and already-playable
//! embed URLs) and Vimeo (page and player URLs). Anything else is not
//! embeddable and degrades to a link card at render time.

use std::sync::LazyLock;

use regex::Regex;

static YOUTUBE_WATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?youtube\.com/watch\?v=([\w-]{6,})").expect("youtube watch")
});
static YOUTUBE_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://youtu\.be/([\w-]{6,})").expect("youtube short"));
static YOUTUBE_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?youtube\.com/embed/([\w-]{6,})").expect("youtube embed")
});
static VIMEO_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://(?:www\.)?vimeo\.com/(\d+)").expect("vimeo page"));
static VIMEO_PLAYER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://player\.vimeo\.com/video/(\d+)").expect("vimeo player")
});

/// The playable iframe URL for a recognized video URL, `None` otherwise.
pub fn playable_url(url: &str) -> Option<String> {
    for pattern in [&*YOUTUBE_WATCH, &*YOUTUBE_SHORT, &*YOUTUBE_EMBED] {
        if let Some(caps) = pattern.captures(url) {
            return Some(format!("https://www.youtube.com/embed/{}", &caps[1]));
        }
    }
    for pattern in [&*VIMEO_PAGE, &*VIMEO_PLAYER] {
        if let Some(caps) = pattern.captures(url) {
            return Some(format!("https://player.vimeo.com/video/{}", &caps[1]));
        }
    }
    None
}

/// Whether a URL is embeddable at all.
pub fn is_embeddable(url: &str) -> bool {
    playable_url(url).is_some()
}

/// Iframe `src` allow-list used by the sanitizer: only the playable forms
/// of the recognized hosts may appear in markup.
pub fn is_allowed_iframe_src(url: &str) -> bool {
    YOUTUBE_EMBED.is_match(url) || VIMEO_PLAYER.is_match(url)
}
