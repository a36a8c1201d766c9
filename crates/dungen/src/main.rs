//! dungen CLI
//!
//! Generates a dungeon layout from a seed and prints it as ASCII along
//! with the run report.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dg_core::dungeon::{
    BossOutcome, Catalog, GenerationConfig, GenerationReport, PlacementOutcome, RectIndex,
    RoomKind, World, generate,
};
use dg_core::{GenRng, GridPos, Rect};

/// Generate a dungeon layout and print it
#[derive(Parser, Debug)]
#[command(name = "dungen")]
#[command(author, version, about = "dungen - generate a room layout", long_about = None)]
struct Args {
    /// Generation seed; random when omitted
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Target room count, start room included
    #[arg(short = 'r', long = "rooms", default_value_t = dg_core::DEFAULT_TARGET_ROOMS)]
    rooms: usize,

    /// Collision-query budget for the placement search
    #[arg(long = "budget", default_value_t = dg_core::DEFAULT_CANDIDATE_BUDGET)]
    budget: usize,

    /// Template catalog JSON file; the built-in catalog when omitted
    #[arg(short = 'c', long = "catalog")]
    catalog: Option<PathBuf>,

    /// Dump the generated world and report as JSON instead of ASCII
    #[arg(long = "dump-json")]
    dump_json: bool,

    /// Show generation debug output on stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Warn
    };
    let _ = simplelog::WriteLogger::init(level, simplelog::Config::default(), std::io::stderr());

    // Catalog problems are the only fatal class, and they fail here,
    // before generation starts
    let catalog = match load_catalog(&args) {
        Ok(catalog) => catalog,
        Err(message) => {
            eprintln!("dungen: {message}");
            return ExitCode::FAILURE;
        }
    };

    let mut rng = match args.seed {
        Some(seed) => GenRng::new(seed),
        None => GenRng::from_entropy(),
    };
    let config = GenerationConfig {
        target_rooms: args.rooms,
        candidate_budget: args.budget,
    };
    let mut oracle = RectIndex::new();

    let (world, report) = generate(&catalog, &config, &mut oracle, &mut rng);

    if args.dump_json {
        match dump_json(&world, &report) {
            Ok(json) => println!("{json}"),
            Err(message) => {
                eprintln!("dungen: {message}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    print!("{}", render_ascii(&world));
    print_report(&report);
    ExitCode::SUCCESS
}

fn load_catalog(args: &Args) -> Result<Catalog, String> {
    match &args.catalog {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("could not read {}: {e}", path.display()))?;
            Catalog::from_json_str(&json).map_err(|e| e.to_string())
        }
        None => Ok(Catalog::demo()),
    }
}

fn dump_json(world: &World, report: &GenerationReport) -> Result<String, String> {
    let value = serde_json::json!({
        "report": report,
        "world": world,
    });
    serde_json::to_string_pretty(&value).map_err(|e| e.to_string())
}

/// Draw every room's wall layer and doors into one character grid
fn render_ascii(world: &World) -> String {
    let Some(extent) = world
        .rooms()
        .map(|r| r.bounds)
        .reduce(|a, b| Rect::new(a.lx.min(b.lx), a.ly.min(b.ly), a.hx.max(b.hx), a.hy.max(b.hy)))
    else {
        return String::new();
    };

    let width = extent.width() as usize;
    let height = extent.height() as usize;
    let mut grid = vec![vec![' '; width]; height];
    let mut put = |pos: GridPos, ch: char| {
        let x = (pos.x - extent.lx) as usize;
        let y = (pos.y - extent.ly) as usize;
        grid[y][x] = ch;
    };

    for room in world.rooms() {
        for pos in room.interior().cells() {
            put(pos, '.');
        }
        for pos in room.bounds.cells() {
            if room.walls.is_wall(pos) {
                put(pos, '#');
            }
        }
    }

    for door in world.doors() {
        let ch = if door.is_open() { '/' } else { '+' };
        for pos in door.footprint().cells() {
            put(pos, ch);
        }
    }

    // Kind markers at each room's center
    for room in world.rooms() {
        let interior = room.interior();
        let center = GridPos::new(
            (interior.lx + interior.hx) / 2,
            (interior.ly + interior.hy) / 2,
        );
        let marker = match room.kind {
            RoomKind::Start => 'S',
            RoomKind::Boss => 'B',
            RoomKind::Combat | RoomKind::Other => continue,
        };
        put(center, marker);
    }

    let mut out = String::with_capacity(height * (width + 1));
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn print_report(report: &GenerationReport) {
    println!();
    println!("seed: {}", report.seed);
    println!(
        "rooms: {} placed / {} requested (+boss)",
        report.placed_rooms, report.requested_rooms
    );

    match report.placement {
        PlacementOutcome::TargetReached => {}
        PlacementOutcome::Exhausted => println!("placement: frontier exhausted early"),
        PlacementOutcome::BudgetSpent => println!("placement: candidate budget spent"),
    }
    if report.boss == BossOutcome::Failed {
        println!("boss: no fit found");
    }

    println!(
        "doors: {} junctions, {} redundant removed, {} dead ends",
        report.doors_paired, report.doors_removed, report.dead_ends
    );
    if report.pairing_anomalies > 0 {
        println!("warnings: {} pairing anomalies", report.pairing_anomalies);
    }
}
