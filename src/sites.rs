//! Knowledge about the sites lyrics come from.
//!
//! Every table here is ordered: the first matching entry wins. Adding a site
//! means adding a row, the control flow in the fetcher and extractor does not
//! change.

use crate::script::Script;

/// Hosts that serve audio/video or shop pages, never lyrics text.
pub const MEDIA_DENYLIST: &[&str] = &["youtube.com", "spotify.com", "apple.com", "amazon.com"];

/// Hosts known to publish lyrics.
pub const LYRICS_HOSTS: &[&str] = &[
    "lyrics.com",
    "azlyrics.com",
    "genius.com",
    "metrolyrics.com",
    "songlyrics.com",
    "musixmatch.com",
    "j-lyric.net",
    "uta-net.com",
    "utamap.com",
    "kashinavi.com",
];

/// URL fragments that mark a page as a transliteration.
pub const ROMANIZED_MARKERS: &[&str] = &["romaji", "romanized", "romanization"];

/// How a host's lyrics container is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRule {
    /// Text of the first element matching the selector
    First(&'static str),
    /// Text of every matching element, in document order, separated by a blank line
    All(&'static str),
}

/// Ordered rules for one host. Rules are tried in order until one yields text.
#[derive(Debug, Clone, Copy)]
pub struct SiteRule {
    pub host_fragment: &'static str,
    pub rules: &'static [HostRule],
}

pub const SITE_RULES: &[SiteRule] = &[
    SiteRule {
        host_fragment: "genius.com",
        rules: &[
            HostRule::First("div.lyrics"),
            HostRule::All("div[data-lyrics-container=\"true\"]"),
        ],
    },
    SiteRule {
        host_fragment: "azlyrics.com",
        rules: &[HostRule::First("div.ringtone ~ div")],
    },
    SiteRule {
        host_fragment: "uta-net.com",
        rules: &[HostRule::First("div#kashi_area")],
    },
    SiteRule {
        host_fragment: "j-lyric.net",
        rules: &[HostRule::First("p#Lyric"), HostRule::First("div.lyricBox")],
    },
];

/// A non-Latin language the search can target, with what is needed to find
/// both its native-script lyrics and their transliteration.
#[derive(Debug, Clone, Copy)]
pub struct TargetLanguage {
    /// Lowercase English name as it appears in requests ("in japanese")
    pub name: &'static str,
    /// Word for "lyrics" in the native script
    pub lyrics_marker: &'static str,
    /// Name of the language in the native script
    pub native_name: &'static str,
    /// Extra query terms that find transliterated lyrics
    pub transliteration_probe: &'static str,
    pub script: Script,
    /// Hosts publishing lyrics in the native script
    pub native_hosts: &'static [&'static str],
}

pub const JAPANESE: TargetLanguage = TargetLanguage {
    name: "japanese",
    lyrics_marker: "歌詞",
    native_name: "日本語",
    transliteration_probe: "romaji lyrics",
    script: Script::Cjk,
    native_hosts: &["uta-net.com", "j-lyric.net", "utamap.com", "kashinavi.com"],
};

/// Non-Latin targets in detection order.
pub const TARGET_LANGUAGES: &[TargetLanguage] = &[JAPANESE];

/// Lowercased host part of a URL, or the whole lowercased input when it does not parse.
pub fn host_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| url.to_lowercase())
}

fn host_matches(url: &str, fragments: &[&str]) -> bool {
    let host = host_of(url);
    fragments.iter().any(|f| host.contains(f))
}

pub fn is_denied(url: &str) -> bool {
    host_matches(url, MEDIA_DENYLIST)
}

pub fn is_lyrics_host(url: &str) -> bool {
    host_matches(url, LYRICS_HOSTS)
}

pub fn is_native_host(url: &str, target: &TargetLanguage) -> bool {
    host_matches(url, target.native_hosts)
}

pub fn is_romanized_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    ROMANIZED_MARKERS.iter().any(|m| lower.contains(m))
}

/// Extraction rules for the host of `url`, if the host is known.
pub fn rules_for(url: &str) -> Option<&'static [HostRule]> {
    let host = host_of(url);
    SITE_RULES
        .iter()
        .find(|site| host.contains(site.host_fragment))
        .map(|site| site.rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denylist_matches_host_only() {
        assert!(is_denied("https://www.youtube.com/watch?v=abc"));
        assert!(!is_denied("https://www.lyrics.com/youtube.com-covers"));
    }

    #[test]
    fn test_known_hosts() {
        assert!(is_lyrics_host("https://www.azlyrics.com/lyrics/avicii/heybrother.html"));
        assert!(!is_lyrics_host("https://example.com/imagine"));
        assert!(is_native_host("https://www.uta-net.com/song/1234/", &JAPANESE));
        assert!(!is_native_host("https://genius.com/x", &JAPANESE));
    }

    #[test]
    fn test_romanized_marker_anywhere_in_url() {
        assert!(is_romanized_url("https://example.com/Lemon-Romaji-Lyrics"));
        assert!(!is_romanized_url("https://example.com/lemon-lyrics"));
    }

    #[test]
    fn test_rules_lookup() {
        let rules = rules_for("https://genius.com/John-lennon-imagine-lyrics").unwrap();
        assert_eq!(rules.len(), 2);
        assert!(matches!(rules[1], HostRule::All(_)));
        assert!(rules_for("https://www.lyrics.com/lyric/1").is_none());
    }

    #[test]
    fn test_host_of_unparseable() {
        assert_eq!(host_of("Not A Url"), "not a url");
        assert_eq!(host_of("https://Genius.COM/a"), "genius.com");
    }
}
