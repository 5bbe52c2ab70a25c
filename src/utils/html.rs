use ammonia;

/// Clean author-supplied HTML using the ammonia library.
///
/// Question and passage text may carry light markup (<b>, <br>, <sub>) that the
/// quiz view renders as-is. Whitelisting keeps that markup while stripping
/// <script>, <iframe> and event-handler attributes, so a subject file fetched
/// from anywhere cannot inject behaviour into the page.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
