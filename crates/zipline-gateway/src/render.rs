//! Minimal server-rendered pages for the form UI.

use axum::response::Html;

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:4rem auto;padding:0 1rem}\
input[type=url],input[type=number]{width:100%;padding:.5rem;margin:.25rem 0}\
button{padding:.5rem 1.5rem;margin-top:.5rem}";

/// Escapes text for interpolation into HTML content or attributes.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>{title}</title><style>{STYLE}</style></head>\
         <body><h1>{title}</h1>{body}</body></html>"
    ))
}

pub fn index_page() -> Html<String> {
    page(
        "Zipline",
        "<form method=\"post\" action=\"/new\">\
         <label>Long URL<input type=\"url\" name=\"inputURL\" required></label>\
         <label>Expiry days (optional)<input type=\"number\" name=\"ttlDays\" min=\"0\"></label>\
         <label>Expiry hours (optional)<input type=\"number\" name=\"ttlHours\" min=\"0\"></label>\
         <button>Shorten</button></form>",
    )
}

pub fn result_page(short_url: &str, original_url: &str) -> Html<String> {
    let short = escape(short_url);
    let origin = escape(original_url);
    page(
        "Zipline",
        &format!(
            "<p>Short link: <a href=\"{short}\">{short}</a></p>\
             <p>Points to: {origin}</p>\
             <p><a href=\"/\">Shorten another</a></p>"
        ),
    )
}

pub fn not_found_page() -> Html<String> {
    page(
        "Not found",
        "<p>That short link does not exist or has expired.</p>\
         <p><a href=\"/\">Shorten a URL</a></p>",
    )
}

pub fn error_page(message: &str) -> Html<String> {
    page(
        "Something went wrong",
        &format!("<p>{}</p><p><a href=\"/\">Back</a></p>", escape(message)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape("<script>\"a\"&'b'</script>"),
            "&lt;script&gt;&quot;a&quot;&amp;&#39;b&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn result_page_escapes_urls() {
        let html = result_page("http://zip.li/abc12345", "https://ex.com/?a=<b>&c=d").0;
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;"));
    }
}
