use std::env;
use std::path::PathBuf;

use scene::ViewerConfig;
use tools::{join_ids, load_from_dir, rank_hour, read_forecast, read_zones, summarize, validate};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "inspect" => cmd_inspect(args),
        "top" => cmd_top(args),
        "validate" => cmd_validate(args),
        "load" => cmd_load(args),
        _ => Err(usage()),
    }
}

fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn cmd_inspect(args: Vec<String>) -> Result<(), String> {
    // taxiviz inspect <forecast.json> [--json]
    let mut path: Option<PathBuf> = None;
    let mut json = false;
    for arg in &args {
        match arg.as_str() {
            "--json" => json = true,
            s if s.starts_with('-') => return Err(format!("unknown arg: {s}\n\n{}", usage())),
            s => path = Some(PathBuf::from(s)),
        }
    }
    let path = path.ok_or_else(usage)?;

    let summary = summarize(&read_forecast(&path)?);
    if json {
        let payload = serde_json::to_string_pretty(&summary).map_err(|e| format!("json: {e}"))?;
        println!("{payload}");
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn cmd_top(args: Vec<String>) -> Result<(), String> {
    // taxiviz top <forecast.json> [--hour N] [--limit N] [--zones zones.geojson]
    let mut path: Option<PathBuf> = None;
    let mut zones_path: Option<PathBuf> = None;
    let mut hour = 0usize;
    let mut limit = ViewerConfig::default().top_zone_count;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--hour" => {
                let v = flag_value(&args, &mut i, "--hour")?;
                hour = v.parse().map_err(|_| format!("--hour expects an index, got {v}"))?;
            }
            "--limit" => {
                let v = flag_value(&args, &mut i, "--limit")?;
                limit = v.parse().map_err(|_| format!("--limit expects a count, got {v}"))?;
            }
            "--zones" => {
                zones_path = Some(PathBuf::from(flag_value(&args, &mut i, "--zones")?));
            }
            s if s.starts_with('-') => return Err(format!("unknown arg: {s}\n\n{}", usage())),
            s => path = Some(PathBuf::from(s)),
        }
        i += 1;
    }
    let path = path.ok_or_else(usage)?;

    let forecast = read_forecast(&path)?;
    let zones = zones_path.as_deref().map(read_zones).transpose()?;
    let ranking = rank_hour(&forecast, zones.as_ref(), hour, limit)?;

    println!("{}", ranking.label);
    for (rank, line) in ranking.lines.iter().enumerate() {
        println!("{:>2}. {line}", rank + 1);
    }
    Ok(())
}

fn cmd_validate(args: Vec<String>) -> Result<(), String> {
    // taxiviz validate <forecast.json> <zones.geojson>
    if args.len() != 2 {
        return Err(usage());
    }
    let forecast = read_forecast(&PathBuf::from(&args[0]))?;
    let zones = read_zones(&PathBuf::from(&args[1]))?;
    let report = validate(&forecast, &zones);

    if !report.zones_without_forecast.is_empty() {
        println!(
            "{} zones have no forecast rows: {}",
            report.zones_without_forecast.len(),
            join_ids(&report.zones_without_forecast)
        );
    }
    if report.is_ok() {
        println!("ok: every forecast zone id exists in the zone dataset");
        return Ok(());
    }
    Err(format!(
        "{} forecast zone ids missing from the zone dataset: {}",
        report.missing_from_zones.len(),
        join_ids(&report.missing_from_zones)
    ))
}

fn cmd_load(args: Vec<String>) -> Result<(), String> {
    // taxiviz load <root> [--zones REL] [--forecast REL ...]
    let defaults = ViewerConfig::default();
    let mut root: Option<PathBuf> = None;
    let mut zones_location = defaults.zones_url;
    let mut forecast_locations: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--zones" => zones_location = flag_value(&args, &mut i, "--zones")?.to_string(),
            "--forecast" => {
                forecast_locations.push(flag_value(&args, &mut i, "--forecast")?.to_string());
            }
            s if s.starts_with('-') => return Err(format!("unknown arg: {s}\n\n{}", usage())),
            s => root = Some(PathBuf::from(s)),
        }
        i += 1;
    }
    let root = root.ok_or_else(usage)?;
    if forecast_locations.is_empty() {
        forecast_locations = defaults.forecast_urls;
    }

    let datasets =
        load_from_dir(&root, &zones_location, &forecast_locations).map_err(|e| e.to_string())?;
    println!(
        "zones:    {} features from {zones_location}",
        datasets.zones.len()
    );
    println!(
        "forecast: {} rows from {}",
        datasets.forecast.predictions.len(),
        datasets.forecast_location
    );
    Ok(())
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "taxiviz".to_string());
    format!(
        "Usage:\n  {exe} inspect <forecast.json> [--json]\n  {exe} top <forecast.json> [--hour N] [--limit N] [--zones zones.geojson]\n  {exe} validate <forecast.json> <zones.geojson>\n  {exe} load <root> [--zones REL] [--forecast REL ...]\n\nNotes:\n- `load` resolves locations against <root> like a static web server and tries forecast candidates in order.\n- Set RUST_LOG=debug to see loader decisions.\n"
    )
}
