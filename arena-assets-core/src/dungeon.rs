//! DUNGEON.TXT: named dungeon descriptions shown on the world map.

use serde::Serialize;

use crate::bytes;
use crate::{AssetError, Result};

pub const DUNGEON_FILENAME: &str = "DUNGEON.TXT";

#[derive(Debug, Clone, Serialize)]
pub struct DungeonEntry {
    pub title: String,
    pub description: String,
}

pub fn parse_dungeon_txt(data: &[u8]) -> Result<Vec<DungeonEntry>> {
    let text = String::from_utf8_lossy(data);

    let mut entries = Vec::new();
    let mut title = String::new();
    let mut description = String::new();

    for line in bytes::lines(&text) {
        let first = line.chars().next().ok_or_else(|| {
            AssetError::Format(format!("{}: empty line in dungeon text", DUNGEON_FILENAME))
        })?;

        if first == '#' {
            flush(&mut entries, &mut title, &mut description);
        } else if title.is_empty() {
            // First line of the file or the line right after a '#': the
            // dungeon name.
            title = line.replace('\r', "");
        } else {
            description.push_str(&line.replace('\r', "\n"));
        }
    }

    // The final pair has no '#' after it.
    flush(&mut entries, &mut title, &mut description);

    Ok(entries)
}

fn flush(entries: &mut Vec<DungeonEntry>, title: &mut String, description: &mut String) {
    if title.is_empty() && description.is_empty() {
        return;
    }

    if description.ends_with('\n') {
        description.pop();
    }

    entries.push(DungeonEntry {
        title: std::mem::take(title),
        description: std::mem::take(description),
    });
}
