//! SPELLSG.65 (the standard spell table) and SPELLMKR.TXT (spell-maker UI
//! descriptions).

use serde::Serialize;

use crate::bytes;
use crate::{AssetError, Result};

pub const SPELLS_FILENAME: &str = "SPELLSG.65";
pub const SPELL_MAKER_FILENAME: &str = "SPELLMKR.TXT";

pub const SPELL_COUNT: usize = 128;
pub const SPELL_MAKER_DESCRIPTION_COUNT: usize = 43;

// Fixed layout of one spell record.
const SPELL_RECORD_SIZE: usize = 85;
const PARAM_COUNT: usize = 6;
const PARAM_SIZE: usize = 6;
const TARGET_TYPE_OFFSET: usize = 36;
const UNKNOWN_OFFSET: usize = 37;
const ELEMENT_OFFSET: usize = 38;
const FLAGS_OFFSET: usize = 39;
const EFFECTS_OFFSET: usize = 41;
const SUB_EFFECTS_OFFSET: usize = 44;
const AFFECTED_ATTRIBUTES_OFFSET: usize = 47;
const COST_OFFSET: usize = 50;
const NAME_OFFSET: usize = 52;
const NAME_SIZE: usize = 33;

#[derive(Debug, Clone, Serialize)]
pub struct SpellRecord {
    pub params: [[u16; 3]; PARAM_COUNT],
    pub target_type: u8,
    pub unknown: u8,
    pub element: u8,
    pub flags: u16,
    pub effects: [u8; 3],
    pub sub_effects: [u8; 3],
    pub affected_attributes: [u8; 3],
    pub cost: u16,
    pub name: String,
}

pub fn parse_standard_spells(data: &[u8]) -> Result<Vec<SpellRecord>> {
    if data.len() < SPELL_COUNT * SPELL_RECORD_SIZE {
        return Err(AssetError::Format(format!(
            "{}: expected {} bytes, got {}",
            SPELLS_FILENAME,
            SPELL_COUNT * SPELL_RECORD_SIZE,
            data.len()
        )));
    }

    let read_u16 = |offset: usize| -> u16 {
        // Offsets stay inside the checked record span.
        bytes::get_u16_le(data, offset).unwrap_or(0)
    };

    let mut spells = Vec::with_capacity(SPELL_COUNT);
    for slot in 0..SPELL_COUNT {
        let base = slot * SPELL_RECORD_SIZE;

        let mut params = [[0u16; 3]; PARAM_COUNT];
        for (i, param) in params.iter_mut().enumerate() {
            let offset = base + i * PARAM_SIZE;
            param[0] = read_u16(offset);
            param[1] = read_u16(offset + 2);
            param[2] = read_u16(offset + 4);
        }

        let mut effects = [0u8; 3];
        let mut sub_effects = [0u8; 3];
        let mut affected_attributes = [0u8; 3];
        for i in 0..3 {
            effects[i] = data[base + EFFECTS_OFFSET + i];
            sub_effects[i] = data[base + SUB_EFFECTS_OFFSET + i];
            affected_attributes[i] = data[base + AFFECTED_ATTRIBUTES_OFFSET + i];
        }

        // The name field is fixed width, null padded.
        let name_bytes = &data[base + NAME_OFFSET..base + NAME_OFFSET + NAME_SIZE];
        let name_len = name_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_SIZE);
        let name = String::from_utf8_lossy(&name_bytes[..name_len]).into_owned();

        spells.push(SpellRecord {
            params,
            target_type: data[base + TARGET_TYPE_OFFSET],
            unknown: data[base + UNKNOWN_OFFSET],
            element: data[base + ELEMENT_OFFSET],
            flags: read_u16(base + FLAGS_OFFSET),
            effects,
            sub_effects,
            affected_attributes,
            cost: read_u16(base + COST_OFFSET),
            name,
        });
    }

    Ok(spells)
}

/// Parses the "#NN" keyed description blocks into the fixed 43-slot table.
pub fn parse_spell_maker_descriptions(data: &[u8]) -> Result<Vec<String>> {
    let text = String::from_utf8_lossy(data);

    let mut descriptions = vec![String::new(); SPELL_MAKER_DESCRIPTION_COUNT];
    let mut current: Option<(usize, String)> = None;

    for line in bytes::lines(&text) {
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            if let Some((index, text)) = current.take() {
                descriptions[index] = text;
            }

            current = Some((parse_description_index(line)?, String::new()));
        } else {
            match current.as_mut() {
                Some((_, text)) => text.push_str(line),
                None => {
                    return Err(AssetError::Format(format!(
                        "{}: text before the first '#' index",
                        SPELL_MAKER_FILENAME
                    )))
                }
            }
        }
    }

    if let Some((index, text)) = current {
        descriptions[index] = text;
    }

    Ok(descriptions)
}

// The index is the (up to) two digits right after the '#'.
fn parse_description_index(line: &str) -> Result<usize> {
    let digits: String = line
        .chars()
        .skip(1)
        .take(2)
        .take_while(|c| c.is_ascii_digit())
        .collect();

    let index = digits.parse::<usize>().map_err(|_| {
        AssetError::Format(format!(
            "{}: '#' line has no description index",
            SPELL_MAKER_FILENAME
        ))
    })?;

    if index >= SPELL_MAKER_DESCRIPTION_COUNT {
        return Err(AssetError::Format(format!(
            "{}: description index {} out of range",
            SPELL_MAKER_FILENAME, index
        )));
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell_file() -> Vec<u8> {
        let mut data = vec![0u8; SPELL_COUNT * SPELL_RECORD_SIZE];

        // Fill in slot 3 with recognizable values.
        let base = 3 * SPELL_RECORD_SIZE;
        data[base..base + 2].copy_from_slice(&0x0102u16.to_le_bytes());
        data[base + 4..base + 6].copy_from_slice(&0x0304u16.to_le_bytes());
        data[base + TARGET_TYPE_OFFSET] = 2;
        data[base + ELEMENT_OFFSET] = 4;
        data[base + FLAGS_OFFSET..base + FLAGS_OFFSET + 2]
            .copy_from_slice(&0xBEEFu16.to_le_bytes());
        data[base + EFFECTS_OFFSET] = 7;
        data[base + SUB_EFFECTS_OFFSET + 1] = 8;
        data[base + AFFECTED_ATTRIBUTES_OFFSET + 2] = 9;
        data[base + COST_OFFSET..base + COST_OFFSET + 2]
            .copy_from_slice(&150u16.to_le_bytes());

        let name = b"Fireball";
        data[base + NAME_OFFSET..base + NAME_OFFSET + name.len()].copy_from_slice(name);

        data
    }

    #[test]
    fn decodes_fixed_offsets() {
        let spells = parse_standard_spells(&spell_file()).unwrap();

        assert_eq!(spells.len(), SPELL_COUNT);
        let spell = &spells[3];
        assert_eq!(spell.params[0], [0x0102, 0, 0x0304]);
        assert_eq!(spell.target_type, 2);
        assert_eq!(spell.element, 4);
        assert_eq!(spell.flags, 0xBEEF);
        assert_eq!(spell.effects[0], 7);
        assert_eq!(spell.sub_effects[1], 8);
        assert_eq!(spell.affected_attributes[2], 9);
        assert_eq!(spell.cost, 150);
        assert_eq!(spell.name, "Fireball");
    }

    #[test]
    fn short_spell_table_is_a_format_error() {
        let data = vec![0u8; SPELL_COUNT * SPELL_RECORD_SIZE - 1];
        assert!(matches!(
            parse_standard_spells(&data),
            Err(AssetError::Format(_))
        ));
    }

    #[test]
    fn indexes_description_blocks() {
        let data = b"#00\r\nTouch description.\r\n#05\r\nRange line one.\r\nRange line two.\r\n#42\r\nLast slot.\r\n";
        let descriptions = parse_spell_maker_descriptions(data).unwrap();

        assert_eq!(descriptions.len(), SPELL_MAKER_DESCRIPTION_COUNT);
        assert_eq!(descriptions[0], "Touch description.\r");
        assert_eq!(descriptions[5], "Range line one.\rRange line two.\r");
        assert_eq!(descriptions[42], "Last slot.\r");
        assert!(descriptions[1].is_empty());
    }

    #[test]
    fn single_digit_index_parses() {
        let data = b"#7\r\nText.\r\n";
        let descriptions = parse_spell_maker_descriptions(data).unwrap();
        assert_eq!(descriptions[7], "Text.\r");
    }

    #[test]
    fn missing_index_is_a_format_error() {
        assert!(matches!(
            parse_spell_maker_descriptions(b"#\r\nText.\r\n"),
            Err(AssetError::Format(_))
        ));
    }

    #[test]
    fn out_of_range_index_is_a_format_error() {
        assert!(matches!(
            parse_spell_maker_descriptions(b"#43\r\nText.\r\n"),
            Err(AssetError::Format(_))
        ));
    }
}
