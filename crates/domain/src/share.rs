//! Social share links for an article

use serde::Serialize;

const DEFAULT_SHARE_TITLE: &str = "Check out this article!";

/// Share URLs for each supported network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    pub facebook: String,
    pub twitter: String,
    pub linkedin: String,
    pub reddit: String,
}

/// Build share links for a page URL
pub fn share_links(url: &str, title: Option<&str>) -> ShareLinks {
    let url = urlencoding::encode(url);
    let title = urlencoding::encode(title.unwrap_or(DEFAULT_SHARE_TITLE));

    ShareLinks {
        facebook: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
        twitter: format!("https://twitter.com/intent/tweet?url={}&text={}", url, title),
        linkedin: format!(
            "https://www.linkedin.com/shareArticle?url={}&title={}",
            url, title
        ),
        reddit: format!("https://www.reddit.com/submit?url={}&title={}", url, title),
    }
}

/// Public URL of an article page
pub fn article_url(origin: &str, slug: &str) -> String {
    format!("{}/article/{}", origin.trim_end_matches('/'), slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_links_encode_parameters() {
        let links = share_links(
            "https://gazette.example/article/ia-et-societe",
            Some("IA & société"),
        );

        assert_eq!(
            links.facebook,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fgazette.example%2Farticle%2Fia-et-societe"
        );
        assert!(links.twitter.ends_with("&text=IA%20%26%20soci%C3%A9t%C3%A9"));
        assert!(links.reddit.contains("title=IA%20%26"));
    }

    #[test]
    fn test_share_links_default_title() {
        let links = share_links("https://gazette.example/", None);
        assert!(links.linkedin.ends_with("&title=Check%20out%20this%20article%21"));
    }

    #[test]
    fn test_article_url() {
        assert_eq!(
            article_url("https://gazette.example/", "bonjour"),
            "https://gazette.example/article/bonjour"
        );
    }
}
