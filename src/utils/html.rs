/// Sanitizes user-supplied HTML (post bodies, comments) with ammonia.
///
/// Whitelist based: formatting tags such as <p> and <b> survive, <script>
/// and event-handler attributes are removed together with their content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
