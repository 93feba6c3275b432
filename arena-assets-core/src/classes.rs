//! CLASSES.DAT (the quiz-to-class generation table) and the full character
//! class definitions assembled from the class arrays carried by the game
//! executable.

use serde::{Deserialize, Serialize};

use crate::quiz::ClassCategory;
use crate::{AssetError, Result};

pub const CLASSES_FILENAME: &str = "CLASSES.DAT";

pub const CLASS_COUNT: usize = 18;
pub const CHOICE_COUNT: usize = 66;

// Bit layout of a packed class byte.
pub const CLASS_ID_MASK: u8 = 0x1F;
pub const SPELLCASTER_MASK: u8 = 0x20;
pub const CRITICAL_HIT_MASK: u8 = 0x40;
pub const THIEF_MASK: u8 = 0x80;

/// Flags unpacked from one class byte.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClassFlags {
    pub id: u8,
    pub is_spellcaster: bool,
    pub has_critical_hit: bool,
    pub is_thief: bool,
}

pub(crate) fn decode_class_flags(value: u8) -> ClassFlags {
    ClassFlags {
        id: value & CLASS_ID_MASK,
        is_spellcaster: (value & SPELLCASTER_MASK) != 0,
        has_critical_hit: (value & CRITICAL_HIT_MASK) != 0,
        is_thief: (value & THIEF_MASK) != 0,
    }
}

/// One quiz-answer tally: how many A, B, and C answers a combination has.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AnswerCounts {
    pub a: u8,
    pub b: u8,
    pub c: u8,
}

/// The generation table: 18 packed class bytes followed by 66 answer-count
/// triplets covering every possible quiz outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterClassGeneration {
    classes: Vec<ClassFlags>,
    choices: Vec<AnswerCounts>,
}

impl CharacterClassGeneration {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let needed = CLASS_COUNT + CHOICE_COUNT * 3;
        if data.len() < needed {
            return Err(AssetError::Format(format!(
                "{}: expected at least {} bytes, got {}",
                CLASSES_FILENAME,
                needed,
                data.len()
            )));
        }

        // The class IDs take up the first 18 bytes.
        let classes = data[..CLASS_COUNT]
            .iter()
            .map(|&value| decode_class_flags(value))
            .collect();

        // After the class IDs are 66 groups of A/B/C answer counts.
        let choices = (0..CHOICE_COUNT)
            .map(|i| {
                let offset = CLASS_COUNT + i * 3;
                AnswerCounts {
                    a: data[offset],
                    b: data[offset + 1],
                    c: data[offset + 2],
                }
            })
            .collect();

        Ok(CharacterClassGeneration { classes, choices })
    }

    pub fn classes(&self) -> &[ClassFlags] {
        &self.classes
    }

    pub fn choices(&self) -> &[AnswerCounts] {
        &self.choices
    }

    /// Maps a finished quiz's A/B/C answer tally to its class index: the
    /// position of the matching entry in the choices table. Every legal
    /// tally has an entry; a miss means the data is from the wrong game
    /// version.
    pub fn choice_index(&self, a: u8, b: u8, c: u8) -> Result<usize> {
        self.choices
            .iter()
            .position(|choice| choice.a == a && choice.b == b && choice.c == c)
            .ok_or_else(|| {
                AssetError::MissingKey(format!(
                    "{}: no choice entry for tally ({}, {}, {})",
                    CLASSES_FILENAME, a, b, c
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArmorMaterial {
    Leather,
    Chain,
    Plate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShieldType {
    Buckler,
    Round,
    Kite,
    Tower,
}

/// Weapon IDs as the executable orders them (staff, sword, ..., long bow).
pub const WEAPON_COUNT: usize = 18;

/// Per-class arrays extracted from the game executable. The executable
/// itself is decoded elsewhere; this is the seam it hands its class data
/// through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDataSource {
    pub class_names: Vec<String>,
    pub preferred_attributes: Vec<String>,
    pub allowed_armors: Vec<u8>,
    pub allowed_shields_indices: Vec<i32>,
    pub allowed_shields_lists: Vec<Vec<u8>>,
    pub allowed_weapons_indices: Vec<i32>,
    pub allowed_weapons_lists: Vec<Vec<u8>>,
    pub class_numbers_to_ids: Vec<u8>,
    pub initial_experience_caps: Vec<i32>,
    pub health_dice: Vec<u8>,
    pub lockpicking_divisors: Vec<u8>,
}

/// One playable class, with every legacy sentinel resolved into a concrete
/// allow-set.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterClassDefinition {
    pub name: String,
    pub preferred_attributes: String,
    pub allowed_armors: Vec<ArmorMaterial>,
    pub allowed_shields: Vec<ShieldType>,
    pub allowed_weapons: Vec<u8>,
    pub category: ClassCategory,
    pub lockpicking: f64,
    pub health_die: u8,
    pub initial_experience_cap: i32,
    pub class_index: u8,
    pub is_spellcaster: bool,
    pub is_thief: bool,
    pub has_critical_hit: bool,
}

// Shields and armors share one ID space in the executable; shield IDs start
// at 7.
const SHIELD_ID_BASE: u8 = 7;
const SHIELD_ID_MAPPINGS: [ShieldType; 4] = [
    ShieldType::Buckler,
    ShieldType::Round,
    ShieldType::Kite,
    ShieldType::Tower,
];

// Index value meaning "no restriction".
const NO_INDEX: i32 = -1;

pub fn build_class_definitions(source: &ClassDataSource) -> Result<Vec<CharacterClassDefinition>> {
    check_source_lengths(source)?;

    let mut definitions = Vec::with_capacity(CLASS_COUNT);
    for i in 0..CLASS_COUNT {
        let allowed_armors = allowed_armors(source.allowed_armors[i])?;
        let allowed_shields = allowed_shields(
            source.allowed_shields_indices[i],
            &source.allowed_shields_lists,
        )?;
        let allowed_weapons = allowed_weapons(
            source.allowed_weapons_indices[i],
            &source.allowed_weapons_lists,
        )?;

        // The first six classes are mages, the next six thieves, the rest
        // warriors.
        let category = if i < 6 {
            ClassCategory::Mage
        } else if i < 12 {
            ClassCategory::Thief
        } else {
            ClassCategory::Warrior
        };

        let divisor = source.lockpicking_divisors[i];
        if divisor == 0 {
            return Err(AssetError::Format(format!(
                "class data: zero lockpicking divisor for class {}",
                i
            )));
        }
        let lockpicking = f64::from(200 / u32::from(divisor)) / 100.0;

        let flags = decode_class_flags(source.class_numbers_to_ids[i]);

        definitions.push(CharacterClassDefinition {
            name: source.class_names[i].clone(),
            preferred_attributes: source.preferred_attributes[i].clone(),
            allowed_armors,
            allowed_shields,
            allowed_weapons,
            category,
            lockpicking,
            health_die: source.health_dice[i],
            initial_experience_cap: source.initial_experience_caps[i],
            class_index: flags.id,
            is_spellcaster: flags.is_spellcaster,
            is_thief: flags.is_thief,
            has_critical_hit: flags.has_critical_hit,
        });
    }

    Ok(definitions)
}

fn check_source_lengths(source: &ClassDataSource) -> Result<()> {
    let lengths = [
        ("class_names", source.class_names.len()),
        ("preferred_attributes", source.preferred_attributes.len()),
        ("allowed_armors", source.allowed_armors.len()),
        ("allowed_shields_indices", source.allowed_shields_indices.len()),
        ("allowed_weapons_indices", source.allowed_weapons_indices.len()),
        ("class_numbers_to_ids", source.class_numbers_to_ids.len()),
        ("initial_experience_caps", source.initial_experience_caps.len()),
        ("health_dice", source.health_dice.len()),
        ("lockpicking_divisors", source.lockpicking_divisors.len()),
    ];

    for (name, len) in lengths {
        if len != CLASS_COUNT {
            return Err(AssetError::Format(format!(
                "class data: {} has {} entries, expected {}",
                name, len, CLASS_COUNT
            )));
        }
    }

    Ok(())
}

/// Determines which armors are allowed based on a one-digit value.
pub fn allowed_armors(value: u8) -> Result<Vec<ArmorMaterial>> {
    match value {
        0 => Ok(vec![
            ArmorMaterial::Leather,
            ArmorMaterial::Chain,
            ArmorMaterial::Plate,
        ]),
        1 => Ok(vec![ArmorMaterial::Leather, ArmorMaterial::Chain]),
        2 => Ok(vec![ArmorMaterial::Leather]),
        3 => Ok(Vec::new()),
        other => Err(AssetError::Format(format!(
            "class data: bad allowed armors value {}",
            other
        ))),
    }
}

fn allowed_shields(index: i32, lists: &[Vec<u8>]) -> Result<Vec<ShieldType>> {
    if index == NO_INDEX {
        return Ok(SHIELD_ID_MAPPINGS.to_vec());
    }

    let list = usize::try_from(index)
        .ok()
        .and_then(|i| lists.get(i))
        .ok_or_else(|| {
            AssetError::Format(format!("class data: bad shield list index {}", index))
        })?;

    list.iter()
        .map(|&id| {
            id.checked_sub(SHIELD_ID_BASE)
                .and_then(|i| SHIELD_ID_MAPPINGS.get(usize::from(i)))
                .copied()
                .ok_or_else(|| {
                    AssetError::Format(format!("class data: bad shield id {}", id))
                })
        })
        .collect()
}

fn allowed_weapons(index: i32, lists: &[Vec<u8>]) -> Result<Vec<u8>> {
    if index == NO_INDEX {
        return Ok((0..WEAPON_COUNT as u8).collect());
    }

    let list = usize::try_from(index)
        .ok()
        .and_then(|i| lists.get(i))
        .ok_or_else(|| {
            AssetError::Format(format!("class data: bad weapon list index {}", index))
        })?;

    list.iter()
        .map(|&id| {
            if usize::from(id) < WEAPON_COUNT {
                Ok(id)
            } else {
                Err(AssetError::Format(format!(
                    "class data: bad weapon id {}",
                    id
                )))
            }
        })
        .collect()
}
