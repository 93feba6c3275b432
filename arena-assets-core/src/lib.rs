//! Decoders for the game's proprietary data files and the NPC name
//! synthesis engine. Everything is parsed up front into read-only tables
//! owned by [`GameAssets`]; the formats are frozen, so any mismatch between
//! data and decoder is treated as fatal.

use rand::RngCore;
use thiserror::Error;

mod bytes;
pub mod classes;
pub mod dialogue;
pub mod dungeon;
pub mod namegen;
pub mod quiz;
pub mod source;
pub mod spells;
pub mod template;
pub mod worldmap;

use classes::{
    build_class_definitions, CharacterClassDefinition, CharacterClassGeneration,
    ClassDataSource, CLASSES_FILENAME,
};
use dialogue::{
    parse_artifact_text, parse_trade_text, ArtifactTavernText, TradeText,
    ARTIFACT_FILENAME_1, ARTIFACT_FILENAME_2, EQUIPMENT_FILENAME, MAGES_GUILD_FILENAME,
    SELLING_FILENAME, TAVERN_FILENAME,
};
use dungeon::{parse_dungeon_txt, DungeonEntry, DUNGEON_FILENAME};
use namegen::{parse_name_chunks, NAME_CHUNKS_FILENAME};
use quiz::{parse_question_txt, CharacterQuestion, QUESTION_FILENAME};
use source::ResourceSource;
use spells::{
    parse_spell_maker_descriptions, parse_standard_spells, SpellRecord,
    SPELLS_FILENAME, SPELL_MAKER_FILENAME,
};
use template::{TemplateTextTable, TEMPLATE_FILENAME};
use worldmap::{
    parse_world_map_masks, WorldMapMask, WorldMapTerrain, TERRAIN_FILENAME,
    WORLD_MAP_FILENAME,
};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
    #[error("corrupt asset: {0}")]
    Format(String),
    #[error("missing key: {0}")]
    MissingKey(String),
}

pub type Result<T> = std::result::Result<T, AssetError>;

/// Every decoded asset table, loaded once and read-only afterwards.
pub struct GameAssets {
    template_text: TemplateTextTable,
    questions: Vec<CharacterQuestion>,
    class_generation: CharacterClassGeneration,
    class_definitions: Vec<CharacterClassDefinition>,
    dungeons: Vec<DungeonEntry>,
    artifact_tavern_text_1: Vec<ArtifactTavernText>,
    artifact_tavern_text_2: Vec<ArtifactTavernText>,
    trade_text: TradeText,
    name_chunks: Vec<Vec<String>>,
    standard_spells: Vec<SpellRecord>,
    spell_maker_descriptions: Vec<String>,
    world_map_masks: Vec<WorldMapMask>,
    world_map_terrain: WorldMapTerrain,
}

impl GameAssets {
    /// Decodes every asset table in a fixed order. Any failure aborts the
    /// whole load; there is no partial-success mode because every table is
    /// required at runtime.
    pub fn load(
        source: &dyn ResourceSource,
        class_source: &ClassDataSource,
    ) -> Result<GameAssets> {
        let template_text = TemplateTextTable::parse(&source.open(TEMPLATE_FILENAME)?)?;
        let questions = parse_question_txt(&source.open(QUESTION_FILENAME)?)?;
        let class_generation =
            CharacterClassGeneration::parse(&source.open(CLASSES_FILENAME)?)?;
        let class_definitions = build_class_definitions(class_source)?;
        let dungeons = parse_dungeon_txt(&source.open(DUNGEON_FILENAME)?)?;

        let artifact_tavern_text_1 =
            parse_artifact_text(&source.open(ARTIFACT_FILENAME_1)?, ARTIFACT_FILENAME_1)?;
        let artifact_tavern_text_2 =
            parse_artifact_text(&source.open(ARTIFACT_FILENAME_2)?, ARTIFACT_FILENAME_2)?;

        let trade_text = TradeText {
            equipment: parse_trade_text(
                &source.open(EQUIPMENT_FILENAME)?,
                EQUIPMENT_FILENAME,
            )?,
            mages_guild: parse_trade_text(
                &source.open(MAGES_GUILD_FILENAME)?,
                MAGES_GUILD_FILENAME,
            )?,
            selling: parse_trade_text(&source.open(SELLING_FILENAME)?, SELLING_FILENAME)?,
            tavern: parse_trade_text(&source.open(TAVERN_FILENAME)?, TAVERN_FILENAME)?,
        };

        let name_chunks = parse_name_chunks(&source.open(NAME_CHUNKS_FILENAME)?)?;

        // The spell table's filename casing varies between distributions.
        let standard_spells =
            parse_standard_spells(&source.open_case_insensitive(SPELLS_FILENAME)?)?;
        let spell_maker_descriptions =
            parse_spell_maker_descriptions(&source.open(SPELL_MAKER_FILENAME)?)?;

        let world_map_masks = parse_world_map_masks(&source.open(WORLD_MAP_FILENAME)?)?;
        let world_map_terrain = WorldMapTerrain::parse(&source.open(TERRAIN_FILENAME)?)?;

        Ok(GameAssets {
            template_text,
            questions,
            class_generation,
            class_definitions,
            dungeons,
            artifact_tavern_text_1,
            artifact_tavern_text_2,
            trade_text,
            name_chunks,
            standard_spells,
            spell_maker_descriptions,
            world_map_masks,
            world_map_terrain,
        })
    }

    pub fn template_text(&self) -> &TemplateTextTable {
        &self.template_text
    }

    pub fn questions(&self) -> &[CharacterQuestion] {
        &self.questions
    }

    pub fn class_generation(&self) -> &CharacterClassGeneration {
        &self.class_generation
    }

    pub fn class_definitions(&self) -> &[CharacterClassDefinition] {
        &self.class_definitions
    }

    pub fn dungeons(&self) -> &[DungeonEntry] {
        &self.dungeons
    }

    pub fn artifact_tavern_text_1(&self) -> &[ArtifactTavernText] {
        &self.artifact_tavern_text_1
    }

    pub fn artifact_tavern_text_2(&self) -> &[ArtifactTavernText] {
        &self.artifact_tavern_text_2
    }

    pub fn trade_text(&self) -> &TradeText {
        &self.trade_text
    }

    pub fn name_chunks(&self) -> &[Vec<String>] {
        &self.name_chunks
    }

    pub fn standard_spells(&self) -> &[SpellRecord] {
        &self.standard_spells
    }

    pub fn spell_maker_descriptions(&self) -> &[String] {
        &self.spell_maker_descriptions
    }

    pub fn world_map_masks(&self) -> &[WorldMapMask] {
        &self.world_map_masks
    }

    pub fn world_map_terrain(&self) -> &WorldMapTerrain {
        &self.world_map_terrain
    }

    /// Synthesizes an NPC name for the race/gender pair against the loaded
    /// chunk tables. Deterministic for a fixed generator draw sequence.
    pub fn generate_name(
        &self,
        race_id: usize,
        is_male: bool,
        rng: &mut dyn RngCore,
    ) -> Result<String> {
        namegen::generate_name(&self.name_chunks, race_id, is_male, rng)
    }
}
