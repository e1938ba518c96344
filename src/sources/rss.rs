//! RSS feed document source.
//!
//! Fetches an RSS feed and turns each `<item>` into one document: the item
//! link as the key, and the title plus description (stripped of embedded
//! HTML) as the text. Feeds routinely wrap descriptions in CDATA and pack
//! markup inside them; both are handled.

use quick_xml::Reader;
use quick_xml::events::{BytesRef, Event};
use tracing::{info, instrument, warn};

use crate::error::GazetteError;
use crate::models::Document;
use crate::sources::{DocumentSource, SourceItem};
use crate::utils::html_to_text;

/// One `<item>` pulled out of a feed.
#[derive(Debug, Default, Clone)]
struct FeedItem {
    title: String,
    link: String,
    description: String,
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Title,
    Link,
    Description,
}

/// A document source backed by an RSS feed.
#[derive(Debug, Clone)]
pub struct RssSource {
    url: String,
    client: reqwest::Client,
}

impl RssSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl DocumentSource for RssSource {
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn documents(&self) -> Result<Vec<SourceItem>, GazetteError> {
        let xml = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| GazetteError::Config(format!("feed request failed: {e}")))?
            .text()
            .await
            .map_err(|e| GazetteError::Config(format!("feed body unreadable: {e}")))?;

        let items = parse_feed(&xml)?
            .into_iter()
            .enumerate()
            .map(|(i, item)| feed_item_to_source_item(i, item))
            .collect::<Vec<_>>();

        info!(count = items.len(), "Indexed items from RSS feed");
        Ok(items)
    }
}

/// Parse the `<item>` elements out of an RSS document.
fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, GazetteError> {
    // No trim_text: an entity reference splits its surrounding text into
    // separate events, and trimming each one would eat the spaces around
    // the reference. Whitespace between elements lands on `field = None`
    // and is ignored by `append_field`.
    let mut reader = Reader::from_str(xml);

    let mut items = Vec::new();
    let mut current: Option<FeedItem> = None;
    let mut field: Option<Field> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| GazetteError::Config(format!("malformed feed XML: {e}")))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"item" => {
                    current = Some(FeedItem::default());
                    field = None;
                }
                b"title" => field = Some(Field::Title),
                b"link" => field = Some(Field::Link),
                b"description" => field = Some(Field::Description),
                _ => field = None,
            },
            Event::Text(t) => {
                let text = t
                    .decode()
                    .map_err(|e| GazetteError::Config(format!("malformed feed text: {e}")))?
                    .into_owned();
                append_field(&mut current, field, &text);
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                append_field(&mut current, field, &text);
            }
            Event::GeneralRef(r) => {
                let text = resolve_reference(&r)?;
                append_field(&mut current, field, &text);
            }
            Event::End(e) => {
                if e.name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

fn append_field(current: &mut Option<FeedItem>, field: Option<Field>, text: &str) {
    let Some(item) = current.as_mut() else {
        // Channel-level title/link/description, not part of any item.
        return;
    };
    match field {
        Some(Field::Title) => item.title.push_str(text),
        Some(Field::Link) => item.link.push_str(text),
        Some(Field::Description) => item.description.push_str(text),
        None => {}
    }
}

/// Expand a general entity reference back into the text it stands for.
///
/// The reader reports references (`&amp;`, `&#169;`, ...) as their own
/// events instead of expanding them in place. Character references and the
/// five predefined XML entities are resolved; anything else is kept as its
/// literal `&name;` spelling, since feeds in the wild lean on HTML entities
/// that XML never defined.
fn resolve_reference(r: &BytesRef) -> Result<String, GazetteError> {
    if let Some(ch) = r
        .resolve_char_ref()
        .map_err(|e| GazetteError::Config(format!("malformed feed entity: {e}")))?
    {
        return Ok(ch.to_string());
    }
    let name = r
        .decode()
        .map_err(|e| GazetteError::Config(format!("malformed feed entity: {e}")))?;
    let text = match name.as_ref() {
        "amp" => "&".to_string(),
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "apos" => "'".to_string(),
        "quot" => "\"".to_string(),
        other => format!("&{other};"),
    };
    Ok(text)
}

fn feed_item_to_source_item(index: usize, item: FeedItem) -> SourceItem {
    // The link doubles as the document key, so it has to be a real URL.
    let link = item.link.trim();
    if link.is_empty() || url::Url::parse(link).is_err() {
        warn!(index, link = %link, "Feed item has no usable link; reporting as failed");
        return SourceItem::Failed {
            key: format!("item-{index}"),
            reason: "feed item has no usable link".to_string(),
        };
    }

    let mut text = html_to_text(&item.title);
    let description = html_to_text(&item.description);
    if !text.is_empty() && !description.is_empty() {
        text.push_str(". ");
    }
    text.push_str(&description);

    SourceItem::Ok(Document {
        key: link.to_string(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Example Wire</title>
    <link>https://example.com</link>
    <description>Channel description, not an item.</description>
    <item>
      <title>Apple expands in Paris</title>
      <link>https://example.com/apple-paris</link>
      <description><![CDATA[<p>Apple opened an office in <b>Paris</b>.</p>]]></description>
    </item>
    <item>
      <title>Markets steady</title>
      <link>https://example.com/markets</link>
      <description>Indexes closed flat &amp; unchanged.</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed_extracts_items_in_order() {
        let items = parse_feed(FEED).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Apple expands in Paris");
        assert_eq!(items[0].link, "https://example.com/apple-paris");
        assert_eq!(items[1].title, "Markets steady");
    }

    #[test]
    fn test_parse_feed_ignores_channel_level_fields() {
        let items = parse_feed(FEED).unwrap();
        assert!(items.iter().all(|i| i.title != "Example Wire"));
    }

    #[test]
    fn test_cdata_description_is_stripped_to_text() {
        let items = parse_feed(FEED).unwrap();
        match feed_item_to_source_item(0, items[0].clone()) {
            SourceItem::Ok(doc) => {
                assert_eq!(doc.key, "https://example.com/apple-paris");
                assert_eq!(
                    doc.text,
                    "Apple expands in Paris. Apple opened an office in Paris."
                );
            }
            other => panic!("expected Ok, got {:?}", other),
        }
    }

    #[test]
    fn test_escaped_entities_are_unescaped() {
        let items = parse_feed(FEED).unwrap();
        match feed_item_to_source_item(1, items[1].clone()) {
            SourceItem::Ok(doc) => {
                assert_eq!(doc.text, "Markets steady. Indexes closed flat & unchanged.");
            }
            other => panic!("expected Ok, got {:?}", other),
        }
    }

    #[test]
    fn test_char_references_are_resolved() {
        let xml = r#"<rss><channel><item>
            <title>It&#8217;s 25&#xB0; out</title>
            <link>https://example.com/weather</link>
        </item></channel></rss>"#;
        let items = parse_feed(xml).unwrap();
        assert_eq!(items[0].title, "It\u{2019}s 25\u{B0} out");
    }

    #[test]
    fn test_unknown_entity_kept_literally() {
        let xml = r#"<rss><channel><item>
            <title>Before&nbsp;after</title>
            <link>https://example.com/x</link>
        </item></channel></rss>"#;
        let items = parse_feed(xml).unwrap();
        assert_eq!(items[0].title, "Before&nbsp;after");
    }

    #[test]
    fn test_link_surrounded_by_whitespace_is_usable() {
        let item = FeedItem {
            title: "Padded".to_string(),
            link: "\n  https://example.com/padded\n".to_string(),
            description: String::new(),
        };
        match feed_item_to_source_item(0, item) {
            SourceItem::Ok(doc) => assert_eq!(doc.key, "https://example.com/padded"),
            other => panic!("expected Ok, got {:?}", other),
        }
    }

    #[test]
    fn test_item_without_link_is_failed_with_positional_key() {
        let item = FeedItem {
            title: "Orphan".to_string(),
            link: String::new(),
            description: String::new(),
        };
        match feed_item_to_source_item(5, item) {
            SourceItem::Failed { key, .. } => assert_eq!(key, "item-5"),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_item_with_relative_link_is_failed() {
        let item = FeedItem {
            title: "Relative".to_string(),
            link: "/stories/42".to_string(),
            description: String::new(),
        };
        assert!(matches!(
            feed_item_to_source_item(0, item),
            SourceItem::Failed { .. }
        ));
    }

    #[test]
    fn test_empty_feed_yields_no_items() {
        let xml = r#"<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
        assert!(parse_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = "<rss><channel><item><title>Broken</channel></rss>";
        assert!(parse_feed(xml).is_err());
    }
}
