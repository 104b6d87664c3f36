//! stagegen: generate a stage and print it
//!
//! Debugging front-end for sg-core. Everything here is presentation; the
//! stage itself comes straight from `StageGenerator`.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{LevelFilter, info};

use sg_core::{GenerationReport, GeneratorConfig, RoomCategory, StageGenerator, TemplatePool};

mod render;

#[derive(Parser, Debug)]
#[command(name = "stagegen")]
#[command(author, version, about = "Generate a dungeon stage room graph", long_about = None)]
struct Args {
    /// JSON generator configuration; flags below override it
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// JSON template pool (defaults to the built-in pool)
    #[arg(short = 't', long = "templates")]
    templates: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long = "width")]
    width: Option<u32>,

    /// Grid height in cells
    #[arg(long = "height")]
    height: Option<u32>,

    /// Shortest main path
    #[arg(long = "min-path")]
    min_path: Option<u32>,

    /// Longest main path
    #[arg(long = "max-path")]
    max_path: Option<u32>,

    /// Treasure and shop rooms combined
    #[arg(long = "specials")]
    specials: Option<u32>,

    /// Chance for a main-path room to grow a branch
    #[arg(long = "branch-probability")]
    branch_probability: Option<f32>,

    /// Random seed (fresh one when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn build_config(&self) -> Result<GeneratorConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(min) = self.min_path {
            config.min_main_path_length = min;
        }
        if let Some(max) = self.max_path {
            config.max_main_path_length = max;
        }
        if let Some(specials) = self.specials {
            config.special_room_count = specials;
        }
        if let Some(p) = self.branch_probability {
            config.branch_probability = p;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let config = args.build_config()?;
    let pool = match &args.templates {
        Some(path) => TemplatePool::from_file(path)?,
        None => TemplatePool::standard(),
    };
    info!("loaded {} room templates", pool.len());

    let mut generator = StageGenerator::new(config, pool)?;
    let stage = generator.generate_stage();

    print!("{}", render::render_stage(&stage));
    println!();
    if let Some(report) = generator.last_report() {
        print_report(report, &stage);
    }

    Ok(())
}

fn print_report(report: &GenerationReport, stage: &sg_core::StageGrid) {
    println!("seed:        {}", report.seed);
    if report.aborted {
        println!("aborted:     no start template");
        return;
    }
    println!("rooms:       {}", stage.room_count());
    println!(
        "main path:   {}/{}",
        report.main_path_placed, report.planned_main_path
    );
    match stage.boss_position() {
        Some(pos) => println!("boss:        {pos}"),
        None => println!("boss:        missing"),
    }
    println!(
        "branches:    {} ({} rooms)",
        report.branches_grown, report.branch_rooms
    );
    println!(
        "treasure:    {}/{}",
        report.treasure_placed, report.treasure_requested
    );
    println!("shop:        {}/{}", report.shop_placed, report.shop_requested);
    println!(
        "doors:       {} connected, {} walls",
        report.connected_doors, report.walls
    );
    for category in RoomCategory::SPECIAL {
        for room in stage.rooms_of(category) {
            println!("  {category} at {}", room.position());
        }
    }
}
