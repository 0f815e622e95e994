//! Anchor scraping for plain HTML directory listings (Apache, nginx
//! autoindex, `python -m http.server` and friends).

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("valid anchor regex")
});

/// Every anchor `href` in `html`, resolved against `page`, in document order.
///
/// Links that do not resolve are skipped.
pub fn anchor_targets(html: &str, page: &Url) -> Vec<Url> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)))
        .filter_map(|m| page.join(&unescape_entities(m.as_str())).ok())
        .collect()
}

fn unescape_entities(href: &str) -> String {
    href.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("http://music.test/songs/Anuv/").unwrap()
    }

    #[test]
    fn extracts_quoted_and_unquoted_hrefs_in_order() {
        let html = r#"
            <ul>
              <li><a href="../">Parent</a></li>
              <li><A HREF='Baarishein%20-%20Anuv.mp3'>Baarishein</A></li>
              <li><a class="f" href=Riha.mp3>Riha</a></li>
            </ul>"#;
        let urls: Vec<String> = anchor_targets(html, &page())
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            urls,
            vec![
                "http://music.test/songs/",
                "http://music.test/songs/Anuv/Baarishein%20-%20Anuv.mp3",
                "http://music.test/songs/Anuv/Riha.mp3",
            ]
        );
    }

    #[test]
    fn absolute_links_and_entities_are_resolved() {
        let html = r#"<a href="/songs/Anuv/A&amp;B.mp3">x</a>"#;
        let urls = anchor_targets(html, &page());
        assert_eq!(urls[0].path(), "/songs/Anuv/A&B.mp3");
    }

    #[test]
    fn anchors_without_href_are_ignored() {
        assert!(anchor_targets(r#"<a name="top">top</a>"#, &page()).is_empty());
    }
}
