//! Artifact and trade dialogue: flat files of consecutive null-terminated
//! strings whose nesting is fixed by the format, not by the data.

use serde::Serialize;

use crate::bytes;
use crate::{AssetError, Result};

pub const ARTIFACT_FILENAME_1: &str = "ARTFACT1.DAT";
pub const ARTIFACT_FILENAME_2: &str = "ARTFACT2.DAT";
pub const EQUIPMENT_FILENAME: &str = "EQUIP.DAT";
pub const MAGES_GUILD_FILENAME: &str = "MUGUILD.DAT";
pub const SELLING_FILENAME: &str = "SELLING.DAT";
pub const TAVERN_FILENAME: &str = "TAVERN.DAT";

pub const ARTIFACT_BLOCK_COUNT: usize = 16;

/// One artifact's tavern dialogue: five situations, three variations each.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtifactTavernText {
    pub greetings: [String; 3],
    pub barter_successes: [String; 3],
    pub offer_refusals: [String; 3],
    pub barter_failures: [String; 3],
    pub counter_offers: [String; 3],
}

/// One trade file: 4 store functions x 5 personalities x 3 variations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TradeTextBlock {
    pub functions: [[[String; 3]; 5]; 4],
}

/// All four trade text files.
#[derive(Debug, Clone, Serialize)]
pub struct TradeText {
    pub equipment: TradeTextBlock,
    pub mages_guild: TradeTextBlock,
    pub selling: TradeTextBlock,
    pub tavern: TradeTextBlock,
}

fn read_string(data: &[u8], offset: &mut usize, filename: &str) -> Result<String> {
    let (text, consumed) = bytes::read_cstr(data, *offset).ok_or_else(|| {
        AssetError::Format(format!(
            "{}: string block ran past end of file at offset {}",
            filename, *offset
        ))
    })?;
    *offset += consumed;
    Ok(text)
}

pub fn parse_artifact_text(data: &[u8], filename: &str) -> Result<Vec<ArtifactTavernText>> {
    let mut offset = 0usize;
    let mut blocks = Vec::with_capacity(ARTIFACT_BLOCK_COUNT);

    for _ in 0..ARTIFACT_BLOCK_COUNT {
        let mut block = ArtifactTavernText::default();

        for arr in [
            &mut block.greetings,
            &mut block.barter_successes,
            &mut block.offer_refusals,
            &mut block.barter_failures,
            &mut block.counter_offers,
        ] {
            for s in arr.iter_mut() {
                *s = read_string(data, &mut offset, filename)?;
            }
        }

        blocks.push(block);
    }

    Ok(blocks)
}

pub fn parse_trade_text(data: &[u8], filename: &str) -> Result<TradeTextBlock> {
    let mut offset = 0usize;
    let mut block = TradeTextBlock::default();

    for personality_arr in block.functions.iter_mut() {
        for random_arr in personality_arr.iter_mut() {
            for s in random_arr.iter_mut() {
                *s = read_string(data, &mut offset, filename)?;
            }
        }
    }

    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact_file(tag: &str) -> Vec<u8> {
        // 16 blocks x 5 categories x 3 strings.
        let mut data = Vec::new();
        for block in 0..16 {
            for category in 0..5 {
                for variant in 0..3 {
                    data.extend_from_slice(
                        format!("{}-{}-{}-{}", tag, block, category, variant).as_bytes(),
                    );
                    data.push(0);
                }
            }
        }
        data
    }

    fn trade_file(tag: &str) -> Vec<u8> {
        let mut data = Vec::new();
        for function in 0..4 {
            for personality in 0..5 {
                for variant in 0..3 {
                    data.extend_from_slice(
                        format!("{}-{}-{}-{}", tag, function, personality, variant).as_bytes(),
                    );
                    data.push(0);
                }
            }
        }
        data
    }

    #[test]
    fn artifact_blocks_read_in_declaration_order() {
        let blocks = parse_artifact_text(&artifact_file("art"), "ARTFACT1.DAT").unwrap();

        assert_eq!(blocks.len(), 16);
        assert_eq!(blocks[0].greetings[0], "art-0-0-0");
        assert_eq!(blocks[0].counter_offers[2], "art-0-4-2");
        assert_eq!(blocks[15].barter_failures[1], "art-15-3-1");
    }

    #[test]
    fn trade_shape_is_structural() {
        let block = parse_trade_text(&trade_file("eq"), "EQUIP.DAT").unwrap();

        assert_eq!(block.functions[0][0][0], "eq-0-0-0");
        assert_eq!(block.functions[3][4][2], "eq-3-4-2");
    }

    #[test]
    fn concatenated_files_do_not_cross_contaminate() {
        // Decoding the two artifact files in sequence, each from its own
        // buffer, must keep every string inside its own file's blocks.
        let first = artifact_file("one");
        let second = artifact_file("two");

        let blocks1 = parse_artifact_text(&first, "ARTFACT1.DAT").unwrap();
        let blocks2 = parse_artifact_text(&second, "ARTFACT2.DAT").unwrap();

        assert!(blocks1
            .iter()
            .all(|b| b.greetings.iter().all(|s| s.starts_with("one-"))));
        assert!(blocks2
            .iter()
            .all(|b| b.greetings.iter().all(|s| s.starts_with("two-"))));
    }

    #[test]
    fn truncated_file_is_a_format_error() {
        let mut data = artifact_file("art");
        data.truncate(data.len() / 2);
        assert!(matches!(
            parse_artifact_text(&data, "ARTFACT1.DAT"),
            Err(AssetError::Format(_))
        ));
    }
}
