/// Greeting page for `name`. The name is HTML-escaped.
pub fn greet_user(name: &str) -> String {
    format!("<h1>Hello, {}!</h1>", escape_html(name))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_greeted() {
        assert_eq!(greet_user("Zaber"), "<h1>Hello, Zaber!</h1>");
    }

    #[test]
    fn markup_is_escaped() {
        assert_eq!(
            greet_user("<script>\"x\" & 'y'</script>"),
            "<h1>Hello, &lt;script&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/script&gt;!</h1>"
        );
    }
}
