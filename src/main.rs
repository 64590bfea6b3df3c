use clap::Parser;
use load_planner::export::SavedLayout;
use load_planner::metrics::{self, AxleSplit};
use load_planner::packer::{PackCounts, ShelfPacker};
use load_planner::render;
use load_planner::types::{EchoedObject, PalletKind, Placed, Trailer};

#[derive(Parser)]
#[command(
    name = "load_planner",
    about = "2D trailer load planner: batch-packs pallet counts onto a trailer bed"
)]
struct Cli {
    /// Trailer interior dimensions (LxW in cm, e.g. 1360x245)
    #[arg(long, default_value = "1360x245")]
    trailer: String,

    /// Pallet counts as Type:qty (e.g. Euro:10 Industrie:4)
    #[arg(long = "pallets", num_args = 1..)]
    pallets: Vec<String>,

    /// Extra custom footprints as WxH:qty (e.g. 90x60:2)
    #[arg(long = "custom", num_args = 0..)]
    custom: Vec<String>,

    /// Show an ASCII layout of the bed
    #[arg(long)]
    layout: bool,

    /// Print the saved-layout JSON document instead of the text report
    #[arg(long)]
    json: bool,
}

fn parse_dimensions(s: &str) -> Result<Trailer, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected LxW", s));
    }
    let length = parts[0]
        .parse::<i32>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    let width = parts[1]
        .parse::<i32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    if length <= 0 || width <= 0 {
        return Err(format!("dimensions must be positive in '{}'", s));
    }
    Ok(Trailer::new(length, width))
}

fn parse_count(s: &str, counts: &mut PackCounts) -> Result<(), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid pallet count '{}', expected Type:qty", s));
    }
    let qty = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    match PalletKind::from_name(parts[0]) {
        Some(PalletKind::Euro) => counts.euro += qty,
        Some(PalletKind::Industrie) => counts.industrie += qty,
        Some(PalletKind::Blumenwagen) => counts.blumenwagen += qty,
        Some(PalletKind::Ibc) => counts.ibc += qty,
        _ => {
            return Err(format!(
                "unknown pallet type '{}', expected Euro, Industrie, Blumenwagen or IBC",
                parts[0]
            ));
        }
    }
    Ok(())
}

fn parse_custom(s: &str, counts: &mut PackCounts) -> Result<(), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid custom footprint '{}', expected WxH:qty", s));
    }
    let dims = parse_dimensions(parts[0])?;
    let qty = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    for _ in 0..qty {
        counts.custom.push((dims.length, dims.width));
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let trailer = parse_dimensions(&cli.trailer).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let mut counts = PackCounts::default();
    for p in &cli.pallets {
        if let Err(e) = parse_count(p, &mut counts) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
    for c in &cli.custom {
        if let Err(e) = parse_custom(c, &mut counts) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let report = ShelfPacker::new(trailer).pack(&counts.to_requests());

    let objects: Vec<Placed> = report
        .placements
        .iter()
        .enumerate()
        .map(|(i, p)| Placed {
            id: i as u64 + 1,
            kind: p.kind,
            x: p.x,
            y: p.y,
            w: p.w,
            h: p.h,
            selectable: true,
            evented: true,
        })
        .collect();

    let used = metrics::used_length(metrics::spans_of(&objects));
    let AxleSplit {
        front_pct,
        back_pct,
    } = metrics::axle_split(metrics::spans_of(&objects), trailer);

    if cli.json {
        let echoes: Vec<EchoedObject> = objects.iter().map(EchoedObject::from_placed).collect();
        let doc = SavedLayout::from_echo(trailer, echoes);
        match doc.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for p in &report.placements {
        println!("  {} {}x{} @ ({}, {})", p.kind, p.w, p.h, p.x, p.y);
    }
    for line in &report.log {
        println!("  ! {line}");
    }
    if cli.layout {
        print!("{}", render::render_bed(trailer, &report.placements));
    }

    println!(
        "Summary: {} of {} pallet{} placed, {} cm used, axle split {}/{} front/back",
        report.placements.len(),
        counts.total(),
        if counts.total() == 1 { "" } else { "s" },
        used,
        front_pct,
        back_pct,
    );
}
