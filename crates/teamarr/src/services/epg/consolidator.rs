//! Maintains the on-disk XMLTV artefacts: per-group fragments, a merged
//! `events.xml`, a `teams.xml`, and the final published file. Writes are
//! atomic — built to a temp path, then renamed into place — so a reader
//! never observes a half-written file, and a missing fragment set still
//! produces a well-formed (if empty) document rather than no file at all.

use std::collections::HashMap;

use sandboxed_file_manager::SandboxedManager;

use super::xmltv::{write_xml, Channel, Tv};
use crate::errors::{AppError, AppResult};
use crate::models::Programme;

const GENERATOR_NAME: &str = "teamarr";

pub struct Consolidator {
    files: SandboxedManager,
    published_filename: String,
}

impl Consolidator {
    pub fn new(files: SandboxedManager, published_filename: String) -> Self {
        Self {
            files,
            published_filename,
        }
    }

    fn group_fragment_path(group_id: &uuid::Uuid) -> String {
        format!("event_epg_{group_id}.xml")
    }

    /// Writes one event group's fragment, then rebuilds `events.xml` and
    /// the published file from every fragment currently on disk.
    pub async fn write_group_fragment(
        &self,
        group_id: &uuid::Uuid,
        programmes: &[Programme],
    ) -> AppResult<()> {
        let tv = build_document(programmes);
        self.atomic_write(&Self::group_fragment_path(group_id), &write_xml(&tv)?)
            .await?;
        self.rebuild_events().await?;
        self.rebuild_published().await
    }

    /// Writes `teams.xml` from every team channel's programmes, then
    /// rebuilds the published file.
    pub async fn write_teams(&self, programmes: &[Programme]) -> AppResult<()> {
        let tv = build_document(programmes);
        self.atomic_write("teams.xml", &write_xml(&tv)?).await?;
        self.rebuild_published().await
    }

    /// Merges every `event_epg_*.xml` fragment into `events.xml`,
    /// deduplicating declared channels by id.
    async fn rebuild_events(&self) -> AppResult<()> {
        let fragment_names = self
            .files
            .list_files(".")
            .await
            .map_err(|e| AppError::internal(format!("listing epg fragments failed: {e}")))?
            .into_iter()
            .filter(|name| name.starts_with("event_epg_") && name.ends_with(".xml"))
            .collect::<Vec<_>>();

        let mut channels: HashMap<String, Channel> = HashMap::new();
        let mut programmes = Vec::new();

        for name in fragment_names {
            let content = self
                .files
                .read_to_string(&name)
                .await
                .map_err(|e| AppError::internal(format!("reading fragment {name} failed: {e}")))?;
            let (fragment_channels, fragment_programmes) = parse_fragment(&content)?;
            for channel in fragment_channels {
                channels.entry(channel.id.clone()).or_insert(channel);
            }
            programmes.extend(fragment_programmes);
        }

        let tv = Tv {
            generator_info_name: GENERATOR_NAME.to_string(),
            channels: channels.into_values().collect(),
            programmes,
        };
        self.atomic_write("events.xml", &write_xml(&tv)?).await
    }

    /// Merges `teams.xml` and `events.xml` into the published file. Either
    /// source missing is treated as empty so the published file is always
    /// well-formed.
    async fn rebuild_published(&self) -> AppResult<()> {
        let teams = self.read_document_or_empty("teams.xml").await?;
        let events = self.read_document_or_empty("events.xml").await?;

        let mut channels: HashMap<String, Channel> = HashMap::new();
        for channel in teams.0.into_iter().chain(events.0) {
            channels.entry(channel.id.clone()).or_insert(channel);
        }
        let mut programmes = teams.1;
        programmes.extend(events.1);

        let tv = Tv {
            generator_info_name: GENERATOR_NAME.to_string(),
            channels: channels.into_values().collect(),
            programmes,
        };
        self.atomic_write(&self.published_filename, &write_xml(&tv)?).await
    }

    async fn read_document_or_empty(&self, path: &str) -> AppResult<(Vec<Channel>, Vec<Programme>)> {
        if !self
            .files
            .exists(path)
            .await
            .map_err(|e| AppError::internal(format!("checking {path} failed: {e}")))?
        {
            return Ok((Vec::new(), Vec::new()));
        }
        let content = self
            .files
            .read_to_string(path)
            .await
            .map_err(|e| AppError::internal(format!("reading {path} failed: {e}")))?;
        parse_fragment(&content)
    }

    async fn atomic_write(&self, path: &str, content: &str) -> AppResult<()> {
        let tmp_path = format!("{path}.tmp");
        self.files
            .write(&tmp_path, content.as_bytes())
            .await
            .map_err(|e| AppError::internal(format!("writing {tmp_path} failed: {e}")))?;

        let tmp_full = self
            .files
            .get_full_path(&tmp_path)
            .map_err(|e| AppError::internal(format!("resolving {tmp_path} failed: {e}")))?;
        let final_full = self
            .files
            .get_full_path(path)
            .map_err(|e| AppError::internal(format!("resolving {path} failed: {e}")))?;

        tokio::fs::rename(&tmp_full, &final_full)
            .await
            .map_err(|e| AppError::internal(format!("renaming {path} into place failed: {e}")))
    }
}

pub(crate) fn build_document(programmes: &[Programme]) -> Tv {
    let mut channels: HashMap<String, Channel> = HashMap::new();
    for programme in programmes {
        channels.entry(programme.channel_id.clone()).or_insert(Channel {
            id: programme.channel_id.clone(),
            display_name: super::xmltv::LangText::en(programme.channel_id.clone()),
            icon: programme.icon.clone().map(|src| super::xmltv::Icon { src }),
        });
    }
    Tv {
        generator_info_name: GENERATOR_NAME.to_string(),
        channels: channels.into_values().collect(),
        programmes: programmes.iter().map(Into::into).collect(),
    }
}

/// Parses a previously-written fragment back into channels and programmes
/// for merge purposes. Fragments are always produced by [`write_xml`], so a
/// lightweight attribute/tag scan is enough — a full XMLTV parser isn't
/// needed for data this crate itself wrote.
fn parse_fragment(content: &str) -> AppResult<(Vec<Channel>, Vec<Programme>)> {
    use quick_xml::events::Event as XmlEvent;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut channels = Vec::new();
    let mut programmes = Vec::new();
    let mut current_channel: Option<Channel> = None;
    let mut current_programme: Option<Programme> = None;
    let mut current_tag = String::new();
    let mut current_text = String::new();

    loop {
        match reader
            .read_event()
            .map_err(|e| AppError::internal(format!("malformed epg fragment: {e}")))?
        {
            XmlEvent::Eof => break,
            XmlEvent::Start(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                current_text.clear();
                match name.as_str() {
                    "channel" => {
                        let id = attr(e, "id").unwrap_or_default();
                        current_channel = Some(Channel {
                            id,
                            display_name: super::xmltv::LangText::en(String::new()),
                            icon: None,
                        });
                    }
                    "programme" => {
                        current_programme = Some(Programme {
                            channel_id: attr(e, "channel").unwrap_or_default(),
                            title: String::new(),
                            start: parse_timestamp(&attr(e, "start").unwrap_or_default()),
                            stop: parse_timestamp(&attr(e, "stop").unwrap_or_default()),
                            description: None,
                            category: String::new(),
                            icon: None,
                        });
                    }
                    "icon" => {
                        let src = attr(e, "src").unwrap_or_default();
                        if let Some(channel) = current_channel.as_mut() {
                            channel.icon = Some(super::xmltv::Icon { src: src.clone() });
                        }
                        if let Some(programme) = current_programme.as_mut() {
                            programme.icon = Some(src);
                        }
                    }
                    _ => {}
                }
                current_tag = name;
            }
            XmlEvent::Text(e) => {
                current_text.push_str(&e.unescape().unwrap_or_default());
            }
            XmlEvent::End(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "channel" => {
                        if let Some(channel) = current_channel.take() {
                            channels.push(channel);
                        }
                    }
                    "programme" => {
                        if let Some(programme) = current_programme.take() {
                            programmes.push(programme);
                        }
                    }
                    "display-name" => {
                        if let Some(channel) = current_channel.as_mut() {
                            channel.display_name.text = current_text.trim().to_string();
                        }
                    }
                    "title" => {
                        if let Some(programme) = current_programme.as_mut() {
                            programme.title = current_text.trim().to_string();
                        }
                    }
                    "desc" => {
                        if let Some(programme) = current_programme.as_mut() {
                            programme.description = Some(current_text.trim().to_string());
                        }
                    }
                    "category" => {
                        if let Some(programme) = current_programme.as_mut() {
                            programme.category = current_text.trim().to_string();
                        }
                    }
                    _ => {}
                }
                current_text.clear();
                current_tag.clear();
            }
            _ => {}
        }
    }

    let _ = current_tag;
    Ok((channels, programmes))
}

fn attr(e: &quick_xml::events::BytesStart, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name.as_bytes())
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

fn parse_timestamp(value: &str) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_str(value, "%Y%m%d%H%M%S %z")
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_else(|_| chrono::Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn programme(channel_id: &str, title: &str) -> Programme {
        Programme {
            channel_id: channel_id.to_string(),
            title: title.to_string(),
            start: Utc::now(),
            stop: Utc::now() + chrono::Duration::hours(1),
            description: Some("desc".into()),
            category: "Sports".into(),
            icon: None,
        }
    }

    #[tokio::test]
    async fn round_trips_a_fragment_through_write_and_parse() {
        let tv = build_document(&[programme("500", "Cowboys @ Eagles")]);
        let xml = write_xml(&tv).unwrap();
        let (channels, programmes) = parse_fragment(&xml).unwrap();

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id, "500");
        assert_eq!(programmes.len(), 1);
        assert_eq!(programmes[0].title, "Cowboys @ Eagles");
    }

    #[tokio::test]
    async fn rebuilds_the_published_file_from_empty_sources() {
        let manager = SandboxedManager::builder()
            .base_directory(std::env::temp_dir().join(format!("teamarr-test-{}", uuid::Uuid::new_v4())))
            .build()
            .await
            .unwrap();
        let consolidator = Consolidator::new(manager.clone(), "published.xml".to_string());

        consolidator.rebuild_published().await.unwrap();
        let content = manager.read_to_string("published.xml").await.unwrap();
        assert!(content.contains("<tv"));
    }
}
