use ammonia;

/// Clean user-supplied text using the ammonia library.
///
/// Assessment feedback is free text that later ends up in HTML pages;
/// this strips dangerous tags (like <script>) and malicious attributes
/// (like onclick) before the text is stored.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
