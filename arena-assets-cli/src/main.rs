use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use arena_assets_core::classes::ClassDataSource;
use arena_assets_core::source::DirectorySource;
use arena_assets_core::GameAssets;

#[derive(Debug, Parser)]
#[command(name = "arena-assets", version, about = "Game asset table inspector")]
struct Args {
    /// Directory containing the extracted game data files.
    #[arg(long)]
    data: PathBuf,

    /// JSON file with the per-class arrays extracted from the game
    /// executable.
    #[arg(long)]
    exe_data: PathBuf,

    /// Dump one decoded table as JSON: template, questions, classes,
    /// class-defs, dungeons, artifact1, artifact2, trade, name-chunks,
    /// spells or spell-maker.
    #[arg(long)]
    dump: Option<String>,

    /// Generate sample names for this race ID instead of printing the
    /// table summary.
    #[arg(long)]
    name_race: Option<usize>,

    #[arg(long, default_value_t = false)]
    female: bool,

    #[arg(long, default_value_t = 10)]
    name_count: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    let args = Args::parse();

    let class_source: ClassDataSource = match std::fs::read_to_string(&args.exe_data)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
    {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", args.exe_data, e);
            std::process::exit(1);
        }
    };

    let source = DirectorySource::new(&args.data);
    let assets = match GameAssets::load(&source, &class_source) {
        Ok(assets) => assets,
        Err(e) => {
            eprintln!("Failed to load game assets: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(race_id) = args.name_race {
        let mut rng = StdRng::seed_from_u64(args.seed);
        for _ in 0..args.name_count {
            match assets.generate_name(race_id, !args.female, &mut rng) {
                Ok(name) => println!("{}", name),
                Err(e) => {
                    eprintln!("Name generation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        return;
    }

    if let Some(table) = args.dump.as_deref() {
        match dump_table(&assets, table) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    print_summary(&assets);
}

fn dump_table(assets: &GameAssets, table: &str) -> Result<String, String> {
    let result = match table {
        "template" => serde_json::to_string_pretty(assets.template_text()),
        "questions" => serde_json::to_string_pretty(assets.questions()),
        "classes" => serde_json::to_string_pretty(assets.class_generation()),
        "class-defs" => serde_json::to_string_pretty(assets.class_definitions()),
        "dungeons" => serde_json::to_string_pretty(assets.dungeons()),
        "artifact1" => serde_json::to_string_pretty(assets.artifact_tavern_text_1()),
        "artifact2" => serde_json::to_string_pretty(assets.artifact_tavern_text_2()),
        "trade" => serde_json::to_string_pretty(assets.trade_text()),
        "name-chunks" => serde_json::to_string_pretty(assets.name_chunks()),
        "spells" => serde_json::to_string_pretty(assets.standard_spells()),
        "spell-maker" => serde_json::to_string_pretty(assets.spell_maker_descriptions()),
        other => return Err(format!("Unknown table \"{}\"", other)),
    };

    result.map_err(|e| format!("Failed to serialize {}: {}", table, e))
}

fn print_summary(assets: &GameAssets) {
    println!("template entries:        {}", assets.template_text().len());
    println!("quiz questions:          {}", assets.questions().len());
    println!(
        "generation classes:      {}",
        assets.class_generation().classes().len()
    );
    println!(
        "generation choices:      {}",
        assets.class_generation().choices().len()
    );
    println!("class definitions:       {}", assets.class_definitions().len());
    println!("dungeons:                {}", assets.dungeons().len());
    println!(
        "artifact text blocks:    {} + {}",
        assets.artifact_tavern_text_1().len(),
        assets.artifact_tavern_text_2().len()
    );
    println!("name chunk lists:        {}", assets.name_chunks().len());
    println!("standard spells:         {}", assets.standard_spells().len());
    println!(
        "spell maker descriptions: {}",
        assets.spell_maker_descriptions().len()
    );
    println!("world map masks:         {}", assets.world_map_masks().len());
}
