//! NAMECHNK.DAT decoding and rule-driven NPC name synthesis.
//!
//! The chunk file is a sequence of length-prefixed records, each holding a
//! list of null-terminated name fragments. A per-race/per-gender rule table
//! composes a name by sampling fragments from those lists, sometimes gated
//! by a percentage chance.

use rand::RngCore;

use crate::bytes;
use crate::{AssetError, Result};

pub const NAME_CHUNKS_FILENAME: &str = "NAMECHNK.DAT";

/// Race/gender slots in the rule table: 24 races x 2 genders.
pub const NAME_RULE_SLOT_COUNT: usize = 48;

/// One step of a name composition rule.
#[derive(Debug, Clone, Copy)]
enum NameRule {
    /// Sample a fragment from the chunk list at this index.
    Index(usize),
    /// Append this string verbatim.
    Literal(&'static str),
    /// Sample from the chunk list, but only with the given percent chance.
    IndexChance(usize, u32),
    /// Sample from the chunk list and append the string after it, with the
    /// given percent chance for the whole step.
    IndexLiteralChance(usize, &'static str, u32),
}

use NameRule::{Index, IndexChance, IndexLiteralChance, Literal};

// How to walk the chunk lists for each race and gender, male slot first.
// Races 8..=16 and 17..=20 share their respective rule shapes.
static NAME_RULES: [&[NameRule]; NAME_RULE_SLOT_COUNT] = [
    // Race 0.
    &[Index(0), Index(1), Literal(" "), Index(4), Index(5)],
    &[Index(2), Index(3), Literal(" "), Index(4), Index(5)],
    // Race 1.
    &[Index(6), Index(7), Index(8), IndexChance(9, 75)],
    &[Index(6), Index(7), Index(8), IndexChance(9, 75), Index(10)],
    // Race 2.
    &[Index(11), Index(12), Literal(" "), Index(15), Index(16), Literal("sen")],
    &[Index(13), Index(14), Literal(" "), Index(15), Index(16), Literal("sen")],
    // Race 3.
    &[Index(17), Index(18), Literal(" "), Index(21), Index(22)],
    &[Index(19), Index(20), Literal(" "), Index(21), Index(22)],
    // Race 4.
    &[Index(23), Index(24), Literal(" "), Index(27), Index(28)],
    &[Index(25), Index(26), Literal(" "), Index(27), Index(28)],
    // Race 5.
    &[Index(29), Index(30), Literal(" "), Index(33), Index(34)],
    &[Index(31), Index(32), Literal(" "), Index(33), Index(34)],
    // Race 6.
    &[Index(35), Index(36), Literal(" "), Index(39), Index(40)],
    &[Index(37), Index(38), Literal(" "), Index(39), Index(40)],
    // Race 7.
    &[Index(41), Index(42), Literal(" "), Index(45), Index(46)],
    &[Index(43), Index(44), Literal(" "), Index(45), Index(46)],
    // Race 8.
    &[Index(47), IndexChance(48, 75), Index(49)],
    &[Index(47), IndexChance(48, 75), Index(49)],
    // Race 9.
    &[Index(47), IndexChance(48, 75), Index(49)],
    &[Index(47), IndexChance(48, 75), Index(49)],
    // Race 10.
    &[Index(47), IndexChance(48, 75), Index(49)],
    &[Index(47), IndexChance(48, 75), Index(49)],
    // Race 11.
    &[Index(47), IndexChance(48, 75), Index(49)],
    &[Index(47), IndexChance(48, 75), Index(49)],
    // Race 12.
    &[Index(47), IndexChance(48, 75), Index(49)],
    &[Index(47), IndexChance(48, 75), Index(49)],
    // Race 13.
    &[Index(47), IndexChance(48, 75), Index(49)],
    &[Index(47), IndexChance(48, 75), Index(49)],
    // Race 14.
    &[Index(47), IndexChance(48, 75), Index(49)],
    &[Index(47), IndexChance(48, 75), Index(49)],
    // Race 15.
    &[Index(47), IndexChance(48, 75), Index(49)],
    &[Index(47), IndexChance(48, 75), Index(49)],
    // Race 16.
    &[Index(47), IndexChance(48, 75), Index(49)],
    &[Index(47), IndexChance(48, 75), Index(49)],
    // Race 17.
    &[Index(50), IndexChance(51, 75), Index(52)],
    &[Index(50), IndexChance(51, 75), Index(52)],
    // Race 18.
    &[Index(50), IndexChance(51, 75), Index(52)],
    &[Index(50), IndexChance(51, 75), Index(52)],
    // Race 19.
    &[Index(50), IndexChance(51, 75), Index(52)],
    &[Index(50), IndexChance(51, 75), Index(52)],
    // Race 20.
    &[Index(50), IndexChance(51, 75), Index(52)],
    &[Index(50), IndexChance(51, 75), Index(52)],
    // Race 21.
    &[Index(50), Index(52), Index(53)],
    &[Index(50), Index(52), Index(53)],
    // Race 22.
    &[IndexLiteralChance(54, " ", 25), Index(55), Index(56), Index(57)],
    &[IndexLiteralChance(54, " ", 25), Index(55), Index(56), Index(57)],
    // Race 23.
    &[Index(55), Index(56), Index(57)],
    &[Index(55), Index(56), Index(57)],
];

/// Decodes the chunk file: each record is a 3-byte header (u16 LE total
/// record length, u8 string count) followed by that many null-terminated
/// strings. The cursor advances by the declared record length, so records
/// may carry trailing padding.
pub fn parse_name_chunks(data: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut chunks = Vec::new();
    let mut offset = 0usize;

    while offset < data.len() {
        let chunk_length = bytes::get_u16_le(data, offset).ok_or_else(|| {
            AssetError::Format(format!(
                "{}: truncated record header at offset {}",
                NAME_CHUNKS_FILENAME, offset
            ))
        })? as usize;
        let string_count = *data.get(offset + 2).ok_or_else(|| {
            AssetError::Format(format!(
                "{}: truncated record header at offset {}",
                NAME_CHUNKS_FILENAME, offset
            ))
        })?;

        // A record always covers at least its own header; anything shorter
        // would stall the cursor.
        if chunk_length < 3 {
            return Err(AssetError::Format(format!(
                "{}: record length {} at offset {} is too small",
                NAME_CHUNKS_FILENAME, chunk_length, offset
            )));
        }

        let mut string_offset = offset + 3;
        let mut strings = Vec::with_capacity(usize::from(string_count));
        for _ in 0..string_count {
            let (text, consumed) = bytes::read_cstr(data, string_offset).ok_or_else(|| {
                AssetError::Format(format!(
                    "{}: unterminated string at offset {}",
                    NAME_CHUNKS_FILENAME, string_offset
                ))
            })?;
            string_offset += consumed;
            strings.push(text);
        }

        chunks.push(strings);

        // Advance by the declared length, not by the bytes consumed.
        offset += chunk_length;
    }

    Ok(chunks)
}

/// Composes a name for the given race and gender. One `next_u32` draw per
/// fragment sample plus one per chance gate, in rule order, so a caller
/// that seeds its generator identically gets the same name back.
pub fn generate_name(
    chunks: &[Vec<String>],
    race_id: usize,
    is_male: bool,
    rng: &mut dyn RngCore,
) -> Result<String> {
    let slot = race_id * 2 + usize::from(!is_male);
    let rules = NAME_RULES.get(slot).ok_or_else(|| {
        AssetError::Format(format!("no name rules for race {}", race_id))
    })?;

    let mut name = String::new();
    for rule in rules.iter() {
        match *rule {
            Index(index) => {
                name.push_str(sample_chunk(chunks, index, rng)?);
            }
            Literal(text) => {
                name.push_str(text);
            }
            IndexChance(index, chance) => {
                if rng.next_u32() % 100 <= chance {
                    name.push_str(sample_chunk(chunks, index, rng)?);
                }
            }
            IndexLiteralChance(index, text, chance) => {
                if rng.next_u32() % 100 <= chance {
                    name.push_str(sample_chunk(chunks, index, rng)?);
                    name.push_str(text);
                }
            }
        }
    }

    Ok(name)
}

fn sample_chunk<'a>(
    chunks: &'a [Vec<String>],
    index: usize,
    rng: &mut dyn RngCore,
) -> Result<&'a str> {
    let list = chunks.get(index).ok_or_else(|| {
        AssetError::Format(format!(
            "{}: rule references missing chunk list {}",
            NAME_CHUNKS_FILENAME, index
        ))
    })?;

    if list.is_empty() {
        return Err(AssetError::Format(format!(
            "{}: chunk list {} is empty",
            NAME_CHUNKS_FILENAME, index
        )));
    }

    let pick = rng.next_u32() as usize % list.len();
    Ok(&list[pick])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed sequence of draws, then repeats the last value.
    struct SequenceRng {
        values: Vec<u32>,
        position: usize,
    }

    impl SequenceRng {
        fn new(values: &[u32]) -> Self {
            SequenceRng {
                values: values.to_vec(),
                position: 0,
            }
        }
    }

    impl RngCore for SequenceRng {
        fn next_u32(&mut self) -> u32 {
            let index = self.position.min(self.values.len() - 1);
            self.position += 1;
            self.values[index]
        }

        fn next_u64(&mut self) -> u64 {
            u64::from(self.next_u32())
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for b in dest.iter_mut() {
                *b = self.next_u32() as u8;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn record(strings: &[&str], declared_length: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&declared_length.to_le_bytes());
        data.push(strings.len() as u8);
        for s in strings {
            data.extend_from_slice(s.as_bytes());
            data.push(0);
        }
        // Pad out to the declared length.
        while data.len() < usize::from(declared_length) {
            data.push(0xCC);
        }
        data
    }

    #[test]
    fn cursor_advances_by_declared_length() {
        // Header (length=10, count=2) plus "a\0b\0" is 7 bytes of content;
        // the remaining 3 are padding the cursor must skip.
        let mut data = record(&["a", "b"], 10);
        data.extend_from_slice(&record(&["second"], 10));

        let chunks = parse_name_chunks(&data).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], vec!["a", "b"]);
        assert_eq!(chunks[1], vec!["second"]);
    }

    #[test]
    fn zero_length_record_is_a_format_error() {
        let data = vec![0, 0, 1, b'x', 0];
        assert!(matches!(
            parse_name_chunks(&data),
            Err(AssetError::Format(_))
        ));
    }

    #[test]
    fn unterminated_string_is_a_format_error() {
        let mut data = vec![6, 0, 1];
        data.extend_from_slice(b"abc");
        assert!(matches!(
            parse_name_chunks(&data),
            Err(AssetError::Format(_))
        ));
    }

    #[test]
    fn single_entry_chunks_make_synthesis_independent_of_draws() {
        // Race 21 male: Index(50), Index(52), Index(53). With one string
        // per referenced list, x % 1 == 0 for any draw.
        let mut chunks = vec![Vec::new(); 54];
        chunks[50] = vec!["Bar".to_string()];
        chunks[52] = vec!["en".to_string()];
        chunks[53] = vec!["ziah".to_string()];

        for seed_values in [[0u32, 1, 2], [991, 57, 123]] {
            let mut rng = SequenceRng::new(&seed_values);
            let name = generate_name(&chunks, 21, true, &mut rng).unwrap();
            assert_eq!(name, "Barenziah");
        }
    }

    #[test]
    fn chance_rule_draws_threshold_then_sample() {
        // Race 8 male: Index(47), IndexChance(48, 75), Index(49).
        let mut chunks = vec![Vec::new(); 50];
        chunks[47] = vec!["Gro".to_string()];
        chunks[48] = vec!["gnak".to_string(), "lub".to_string()];
        chunks[49] = vec!["ash".to_string()];

        // Draws: pick 47 -> "Gro"; gate 80 > 75 -> skipped; pick 49.
        let mut rng = SequenceRng::new(&[0, 80, 0]);
        let name = generate_name(&chunks, 8, true, &mut rng).unwrap();
        assert_eq!(name, "Groash");

        // Draws: pick 47; gate 75 <= 75 -> taken; pick index 1; pick 49.
        let mut rng = SequenceRng::new(&[0, 75, 1, 0]);
        let name = generate_name(&chunks, 8, true, &mut rng).unwrap();
        assert_eq!(name, "Grolubash");
    }

    #[test]
    fn literal_rules_append_verbatim() {
        // Race 0 male: Index(0), Index(1), Literal(" "), Index(4), Index(5).
        let mut chunks = vec![Vec::new(); 6];
        chunks[0] = vec!["A".to_string()];
        chunks[1] = vec!["b".to_string()];
        chunks[4] = vec!["C".to_string()];
        chunks[5] = vec!["d".to_string()];

        let mut rng = SequenceRng::new(&[0]);
        let name = generate_name(&chunks, 0, true, &mut rng).unwrap();
        assert_eq!(name, "Ab Cd");
    }

    #[test]
    fn female_slot_uses_its_own_rules() {
        // Race 0 female starts from lists 2 and 3 instead of 0 and 1.
        let mut chunks = vec![Vec::new(); 6];
        chunks[0] = vec!["MALE".to_string()];
        chunks[1] = vec!["male".to_string()];
        chunks[2] = vec!["Fem".to_string()];
        chunks[3] = vec!["ale".to_string()];
        chunks[4] = vec!["Sur".to_string()];
        chunks[5] = vec!["name".to_string()];

        let mut rng = SequenceRng::new(&[0]);
        let name = generate_name(&chunks, 0, false, &mut rng).unwrap();
        assert_eq!(name, "Female Surname");
    }

    #[test]
    fn missing_chunk_list_is_fatal() {
        let chunks = vec![vec!["only".to_string()]];
        let mut rng = SequenceRng::new(&[0]);
        assert!(generate_name(&chunks, 0, true, &mut rng).is_err());
    }

    #[test]
    fn out_of_range_race_is_fatal() {
        let chunks = vec![vec!["x".to_string()]];
        let mut rng = SequenceRng::new(&[0]);
        assert!(generate_name(&chunks, 24, true, &mut rng).is_err());
    }
}
