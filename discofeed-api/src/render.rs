use crate::config::FeedConfig;
use shared_types::ReleaseRecord;
use url::form_urlencoded;

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// URL of the RSS rendition of this server's page for `slug`.
///
/// The page URL is passed to the converter as a query value, so it is
/// encoded once more on top of its own `url=<slug>` query.
pub fn feed_link(feed: &FeedConfig, slug: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("url", slug)
        .finish();
    let page_url = format!("{}?{}", feed.public_url, query);

    let mut link = feed.converter_url.clone();
    link.extend(form_urlencoded::byte_serialize(page_url.as_bytes()));
    link
}

fn render_entry(record: &ReleaseRecord) -> String {
    format!(
        "    <li class=\"h-entry p-name\">{} {} <date class=\"dt-published\">{}</date></li>\n",
        escape_html(&record.title),
        record.status,
        record.display_date()
    )
}

/// Render the h-feed page listing `records`.
pub fn render_feed(
    page_title: &str,
    slug: &str,
    records: &[ReleaseRecord],
    feed: &FeedConfig,
) -> String {
    let title = escape_html(page_title);
    let link = escape_html(&feed_link(feed, slug));
    let entries: String = records.iter().map(render_entry).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="alternate" href="{link}" type="application/rss+xml" title="{title} RSS Feed">
</head>
<body>
<main class="h-feed">
<h1 class="p-name">{title}</h1>
<ul>
{entries}</ul>
</main>
</body>
</html>
"#
    )
}
