//! ID3 tags for downloaded episodes

use id3::frame::Comment;
use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::Path;

use super::describe::to_plain_text;
use crate::error::TagError;
use crate::feed::Episode;

/// Set album, title and comment on the file at `path`
///
/// Existing tags are kept and updated; files without a tag get a fresh one.
pub fn write_episode_tags(path: &Path, episode: &Episode) -> Result<(), TagError> {
    let mut tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
        Err(e) => {
            return Err(TagError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    if !episode.origin.is_empty() {
        tag.set_album(episode.origin.as_str());
    }
    tag.set_title(episode.title.as_str());

    if let Some(description) = episode.description.as_deref() {
        let text = to_plain_text(description);
        if !text.is_empty() {
            tag.add_frame(Comment {
                lang: "eng".to_string(),
                description: String::new(),
                text,
            });
        }
    }

    tag.write_to_path(path, Version::Id3v24)
        .map_err(|e| TagError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::debug!("Tagged {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode() -> Episode {
        Episode {
            origin: "Test Show".to_string(),
            title: "Pilot: Part 1/2".to_string(),
            published_at: None,
            media_url: "https://cdn.example/pilot.mp3".to_string(),
            description: Some("<p>Hello &amp; welcome</p>".to_string()),
        }
    }

    #[test]
    fn test_tags_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pilot.mp3");
        std::fs::write(&path, b"not really audio").unwrap();

        write_episode_tags(&path, &episode()).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.album(), Some("Test Show"));
        // Tags carry the raw title, not the sanitized file name
        assert_eq!(tag.title(), Some("Pilot: Part 1/2"));
        let comments: Vec<&str> = tag.comments().map(|c| c.text.as_str()).collect();
        assert_eq!(comments, vec!["Hello & welcome"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_episode_tags(&dir.path().join("gone.mp3"), &episode()).unwrap_err();
        assert!(matches!(err, TagError::Read { .. }));
    }
}
