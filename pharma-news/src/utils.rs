/// Text processing utilities
pub mod text {
    /// Lowercase `text` and delete everything that is not a word character
    /// or whitespace. Intra-word punctuation is dropped without a
    /// replacement, so `"COVID-19"` becomes `"covid19"`.
    pub fn normalize(text: &str) -> String {
        text.to_lowercase()
            .chars()
            .filter(|c| is_word_char(*c) || c.is_whitespace())
            .collect()
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }
}

/// URL utilities
pub mod url {
    use url::Url;

    /// Whether `url_str` is an absolute http(s) URL
    pub fn is_http_url(url_str: &str) -> bool {
        match Url::parse(url_str) {
            Ok(url) => url.scheme() == "http" || url.scheme() == "https",
            Err(_) => false,
        }
    }
}
