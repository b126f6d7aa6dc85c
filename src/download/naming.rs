//! File names for downloaded episodes

use chrono::NaiveDate;

use crate::feed::Episode;

/// Characters that are reserved in file names on common filesystems
const RESERVED: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Remove every reserved character from `title`
pub fn sanitize(title: &str) -> String {
    title.chars().filter(|c| !RESERVED.contains(c)).collect()
}

/// `"<YYYY-MM-DD> - <origin> - <title>.mp3"`
///
/// The date is taken in the feed's own offset. Episodes without a
/// publication date use `fallback` instead.
pub fn file_name(episode: &Episode, fallback: NaiveDate) -> String {
    let date = episode
        .published_at
        .map(|published| published.date_naive())
        .unwrap_or(fallback);

    format!(
        "{} - {} - {}.mp3",
        date.format("%Y-%m-%d"),
        sanitize(&episode.origin),
        sanitize(&episode.title)
    )
}

/// Name of the file a transfer is written to before it is complete
pub fn staging_name(final_name: &str) -> String {
    format!("{}.part", final_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn episode(title: &str, published: Option<&str>) -> Episode {
        Episode {
            origin: "Show: Live".to_string(),
            title: title.to_string(),
            published_at: published.map(|p| DateTime::parse_from_rfc3339(p).unwrap()),
            media_url: "https://cdn.example/ep.mp3?id=1".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_sanitize_removes_reserved_characters() {
        assert_eq!(sanitize(r#"a<b>c:d"e/f\g|h?i*j"#), "abcdefghij");
        assert_eq!(sanitize("Episode 12 - Plain"), "Episode 12 - Plain");
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("???"), "");
    }

    #[test]
    fn test_sanitize_is_idempotent_and_safe() {
        let samples = [
            "What? Why: How/Now",
            r#"<<>>::""//\\||??**"#,
            "Ünïcödé 🎙 – part 1/2",
            "  spaces  stay  ",
            "tabs\tand\nnewlines",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", sample);
            assert!(!once.contains(RESERVED), "reserved char left in {:?}", once);
        }
    }

    #[test]
    fn test_file_name_uses_publication_date() {
        let fallback = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let name = file_name(&episode("Why? Because.", Some("2024-03-09T23:30:00-05:00")), fallback);
        // The feed's own offset decides the day
        assert_eq!(name, "2024-03-09 - Show Live - Why Because..mp3");
    }

    #[test]
    fn test_file_name_falls_back_without_date() {
        let fallback = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let name = file_name(&episode("Untimed", None), fallback);
        assert_eq!(name, "2025-06-30 - Show Live - Untimed.mp3");
    }

    #[test]
    fn test_staging_name() {
        assert_eq!(staging_name("a.mp3"), "a.mp3.part");
    }
}
