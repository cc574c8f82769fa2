// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use chrono::{DateTime, FixedOffset, Local};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::error::RenderError;

use super::model::{Episode, Podcast};

pub const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
const FEED_LANGUAGE: &str = "en-us";
const ITUNES_PODCAST_TYPE: &str = "serial";

/// RFC 1123 with a numeric zone, e.g. `Mon, 01 Jan 2024 12:00:00 +0000`
const RFC1123_NUMERIC_ZONE: &str = "%a, %d %b %Y %H:%M:%S %z";

type XmlWriter = Writer<Vec<u8>>;

/// Format a timestamp the way RSS dates are written
pub fn format_rss_date(date: &DateTime<FixedOffset>) -> String {
    date.format(RFC1123_NUMERIC_ZONE).to_string()
}

/// Render a podcast to RSS, stamping it with the current time
pub fn render_feed(podcast: &Podcast) -> Result<String, RenderError> {
    render_feed_at(podcast, Local::now().fixed_offset())
}

/// Render a podcast to an RSS 2.0 document with iTunes extensions
///
/// Elements are written in a fixed order so the output of two runs over the
/// same directory only differs in the date fields:
///
/// - channel: `title`, `description`, `language`, `itunes:type`,
///   `itunes:image` (with cover art only), `lastBuildDate`, items
/// - item: `title`, `description`, `pubDate`, `itunes:episode`,
///   `itunes:duration` (non-zero durations only), `enclosure`, `guid`
pub fn render_feed_at(
    podcast: &Podcast,
    last_build_date: DateTime<FixedOffset>,
) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element("rss")
        .with_attribute(("version", "2.0"))
        .with_attribute(("xmlns:itunes", ITUNES_NAMESPACE))
        .write_inner_content(|writer| write_channel(writer, podcast, &last_build_date))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

fn write_channel(
    writer: &mut XmlWriter,
    podcast: &Podcast,
    last_build_date: &DateTime<FixedOffset>,
) -> io::Result<()> {
    writer
        .create_element("channel")
        .write_inner_content(|writer| {
            write_text(writer, "title", &podcast.title)?;
            write_text(writer, "description", &podcast.description)?;
            write_text(writer, "language", FEED_LANGUAGE)?;
            write_text(writer, "itunes:type", ITUNES_PODCAST_TYPE)?;

            if let Some(cover) = &podcast.cover_art_url {
                writer
                    .create_element("itunes:image")
                    .with_attribute(("href", cover.as_str()))
                    .write_empty()?;
            }

            write_text(writer, "lastBuildDate", &format_rss_date(last_build_date))?;

            for episode in &podcast.episodes {
                write_item(writer, episode)?;
            }

            Ok(())
        })?;

    Ok(())
}

fn write_item(writer: &mut XmlWriter, episode: &Episode) -> io::Result<()> {
    writer.create_element("item").write_inner_content(|writer| {
        write_text(writer, "title", &episode.title)?;
        write_text(writer, "description", &episode.description)?;
        write_text(writer, "pubDate", &format_rss_date(&episode.pub_date))?;
        write_text(
            writer,
            "itunes:episode",
            &episode.episode_number.to_string(),
        )?;

        if let Some(duration) = episode.display_duration() {
            write_text(writer, "itunes:duration", &duration)?;
        }

        let length = episode.file_size.to_string();
        writer
            .create_element("enclosure")
            .with_attribute(("url", episode.url.as_str()))
            .with_attribute(("length", length.as_str()))
            .with_attribute(("type", episode.mime_type()))
            .write_empty()?;

        write_text(writer, "guid", episode.guid())?;

        Ok(())
    })?;

    Ok(())
}

/// Write `<name>text</name>`, escaping the text
fn write_text(writer: &mut XmlWriter, name: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}
