use chrono::{DateTime, FixedOffset};

/// A parsed syndication document, independent of its wire format
#[derive(Debug, Clone)]
pub struct Feed {
    pub title: String,
    pub description: Option<String>,
    pub entries: Vec<FeedEntry>,
}

#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub published_at: Option<DateTime<FixedOffset>>,
    /// Media attachment URL, if the entry has one
    pub enclosure: Option<String>,
    pub description: Option<String>,
}

/// Parse a feed document, trying RSS first and Atom second
pub fn parse_feed(content: &[u8]) -> std::result::Result<Feed, String> {
    match parse_as_rss(content) {
        Ok(feed) => {
            tracing::debug!("Parsed as RSS, found {} entries", feed.entries.len());
            Ok(feed)
        }
        Err(rss_err) => {
            tracing::debug!("Failed to parse as RSS: {}, trying Atom", rss_err);
            match parse_as_atom(content) {
                Ok(feed) => {
                    tracing::debug!("Parsed as Atom, found {} entries", feed.entries.len());
                    Ok(feed)
                }
                Err(atom_err) => Err(format!(
                    "not an RSS or Atom document. RSS error: {}. Atom error: {}",
                    rss_err, atom_err
                )),
            }
        }
    }
}

fn parse_as_rss(content: &[u8]) -> std::result::Result<Feed, String> {
    let channel = rss::Channel::read_from(content).map_err(|e| e.to_string())?;

    let entries = channel
        .items()
        .iter()
        .map(|item| FeedEntry {
            title: item.title().unwrap_or("").to_string(),
            published_at: item.pub_date().and_then(parse_timestamp),
            enclosure: item
                .enclosure()
                .map(|enc| enc.url().trim())
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            description: item.description().map(str::to_string),
        })
        .collect();

    Ok(Feed {
        title: channel.title().trim().to_string(),
        description: non_empty(channel.description()),
        entries,
    })
}

fn parse_as_atom(content: &[u8]) -> std::result::Result<Feed, String> {
    let feed = atom_syndication::Feed::read_from(content).map_err(|e| e.to_string())?;

    let entries = feed
        .entries()
        .iter()
        .map(|entry| {
            // Atom requires <updated>, <published> is optional
            let published_at = entry.published().copied().or_else(|| Some(*entry.updated()));

            let enclosure = entry
                .links()
                .iter()
                .find(|link| link.rel() == "enclosure")
                .map(|link| link.href().trim())
                .filter(|href| !href.is_empty())
                .map(str::to_string);

            let description = entry.summary().map(|s| s.as_str().to_string()).or_else(|| {
                entry
                    .content()
                    .and_then(|c| c.value().map(|v| v.to_string()))
            });

            FeedEntry {
                title: entry.title().as_str().to_string(),
                published_at,
                enclosure,
                description,
            }
        })
        .collect();

    Ok(Feed {
        title: feed.title().as_str().trim().to_string(),
        description: feed.subtitle().and_then(|s| non_empty(s.as_str())),
        entries,
    })
}

/// RSS dates are RFC 2822 in theory; some feeds use RFC 3339 instead
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map_err(|e| tracing::debug!("Unparseable publication date '{}': {}", raw, e))
        .ok()
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
    <channel>
        <title>Test Show</title>
        <link>https://example.com</link>
        <description>A show about tests</description>
        <item>
            <title>Episode 2: The Sequel</title>
            <pubDate>Tue, 02 Jan 2024 14:30:00 +0100</pubDate>
            <description>&lt;p&gt;Second&lt;/p&gt;</description>
            <enclosure url="https://example.com/ep2.mp3" length="1024" type="audio/mpeg"/>
        </item>
        <item>
            <title>Blog post</title>
            <description>No audio here</description>
        </item>
        <item>
            <title>Episode 1</title>
            <pubDate>not a date</pubDate>
            <enclosure url="https://example.com/ep1.mp3" length="1024" type="audio/mpeg"/>
        </item>
    </channel>
</rss>"#;

    #[test]
    fn test_parse_rss_feed() {
        let feed = parse_feed(RSS.as_bytes()).unwrap();

        assert_eq!(feed.title, "Test Show");
        assert_eq!(feed.description.as_deref(), Some("A show about tests"));
        assert_eq!(feed.entries.len(), 3);

        let first = &feed.entries[0];
        assert_eq!(first.title, "Episode 2: The Sequel");
        assert_eq!(first.enclosure.as_deref(), Some("https://example.com/ep2.mp3"));
        assert_eq!(first.description.as_deref(), Some("<p>Second</p>"));
        let published = first.published_at.unwrap();
        assert_eq!(published.format("%Y-%m-%d %H:%M").to_string(), "2024-01-02 14:30");

        assert!(feed.entries[1].enclosure.is_none());

        // Bad dates degrade to "unknown" rather than failing the feed
        assert!(feed.entries[2].published_at.is_none());
        assert!(feed.entries[2].enclosure.is_some());
    }

    #[test]
    fn test_parse_atom_feed() {
        let atom = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Atom Show</title>
    <subtitle>Audio in Atom</subtitle>
    <id>https://example.com/atom</id>
    <updated>2024-01-05T12:00:00Z</updated>
    <entry>
        <title>Pilot</title>
        <id>entry-1</id>
        <updated>2024-01-05T12:00:00Z</updated>
        <published>2024-01-01T10:00:00Z</published>
        <summary>The first one</summary>
        <link href="https://example.com/page/1" rel="alternate"/>
        <link href="https://example.com/pilot.mp3" rel="enclosure" type="audio/mpeg" length="2048"/>
    </entry>
    <entry>
        <title>Unpublished</title>
        <id>entry-2</id>
        <updated>2024-01-03T08:00:00Z</updated>
        <link href="https://example.com/second.mp3" rel="enclosure" type="audio/mpeg"/>
    </entry>
</feed>"#;

        let feed = parse_feed(atom.as_bytes()).unwrap();

        assert_eq!(feed.title, "Atom Show");
        assert_eq!(feed.description.as_deref(), Some("Audio in Atom"));
        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].enclosure.as_deref(), Some("https://example.com/pilot.mp3"));
        assert_eq!(feed.entries[0].description.as_deref(), Some("The first one"));
        assert_eq!(
            feed.entries[0].published_at.unwrap().format("%Y-%m-%d").to_string(),
            "2024-01-01"
        );
        // Falls back to <updated>
        assert_eq!(
            feed.entries[1].published_at.unwrap().format("%Y-%m-%d").to_string(),
            "2024-01-03"
        );
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = parse_feed(b"<html><body>Not a feed</body></html>").unwrap_err();
        assert!(err.contains("RSS error"));
        assert!(err.contains("Atom error"));
    }
}
