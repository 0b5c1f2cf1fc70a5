use std::env;
use std::fs;
use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use itinerary_map::tiles::HttpTileFetcher;
use itinerary_map::{
    collect_tile_requests, collect_tile_urls, Itinerary, MapConfig, PrecacheProgress, Precacher,
    RouteLayout, TileDirectory, TileSource, UrlTemplateSource,
};
use serde_json::json;

fn main() {
    env_logger::init();
    if let Err(e) = real_main() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "usage:\n  \
     itinerary-map layout <itinerary.json> [--day DAY_ID] [--config CONFIG.json]\n  \
     itinerary-map tiles <itinerary.json> [--config CONFIG.json]\n  \
     itinerary-map precache <itinerary.json> --out DIR [--config CONFIG.json]"
        .to_string()
}

/// Arguments shared by every subcommand
struct Args {
    itinerary: PathBuf,
    day: Option<String>,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
}

impl Args {
    fn parse(args: &[String]) -> Result<Self> {
        let mut itinerary = None;
        let mut day = None;
        let mut config = None;
        let mut out = None;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--day" => {
                    i += 1;
                    day = Some(args.get(i).context("--day requires a value")?.clone());
                }
                "--config" => {
                    i += 1;
                    config = Some(PathBuf::from(
                        args.get(i).context("--config requires a value")?,
                    ));
                }
                "--out" => {
                    i += 1;
                    out = Some(PathBuf::from(args.get(i).context("--out requires a value")?));
                }
                s if s.starts_with('-') => bail!("unknown arg: {s}\n\n{}", usage()),
                s => {
                    if itinerary.is_some() {
                        bail!("unexpected arg: {s}\n\n{}", usage());
                    }
                    itinerary = Some(PathBuf::from(s));
                }
            }
            i += 1;
        }

        Ok(Self {
            itinerary: itinerary.ok_or_else(|| anyhow!(usage()))?,
            day,
            config,
            out,
        })
    }

    fn load(&self) -> Result<(Itinerary, MapConfig)> {
        let itinerary = Itinerary::from_path(&self.itinerary)
            .with_context(|| format!("read itinerary {:?}", self.itinerary))?;
        let config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path).with_context(|| format!("read {path:?}"))?;
                MapConfig::from_json_str(&raw).with_context(|| format!("parse {path:?}"))?
            }
            None => MapConfig::default(),
        };
        Ok((itinerary, config))
    }
}

fn real_main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some((cmd, rest)) = args.split_first() else {
        bail!(usage());
    };
    let parsed = Args::parse(rest)?;

    match cmd.as_str() {
        "layout" => cmd_layout(&parsed),
        "tiles" => cmd_tiles(&parsed),
        "precache" => cmd_precache(&parsed),
        _ => bail!(usage()),
    }
}

fn cmd_layout(args: &Args) -> Result<()> {
    let (itinerary, config) = args.load()?;
    let source = UrlTemplateSource::new(config.tiles.url_template.clone());

    let days: Vec<_> = match &args.day {
        Some(id) => vec![itinerary
            .day(id)
            .with_context(|| format!("no day {id:?} in {}", itinerary.trip_id))?],
        None => itinerary.days.iter().collect(),
    };

    let mut out = Vec::with_capacity(days.len());
    for day in days {
        let layout = RouteLayout::build(day, &config.canvas, &config.zoom_search)
            .with_context(|| format!("lay out day {}", day.day_id))?;
        let tiles = layout.as_ref().map(|l| l.tile_layer(&source));
        out.push(json!({
            "dayId": day.day_id,
            "label": day.label,
            "route": layout,
            "tiles": tiles,
        }));
    }

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn tile_urls(itinerary: &Itinerary, config: &MapConfig, source: &dyn TileSource) -> Result<Vec<String>> {
    collect_tile_urls(&itinerary.days, &config.canvas, &config.zoom_search, source)
        .context("collect tile urls")
}

fn cmd_tiles(args: &Args) -> Result<()> {
    let (itinerary, config) = args.load()?;
    let source = UrlTemplateSource::new(config.tiles.url_template.clone());
    for url in tile_urls(&itinerary, &config, &source)? {
        println!("{url}");
    }
    Ok(())
}

fn cmd_precache(args: &Args) -> Result<()> {
    let out = args
        .out
        .as_ref()
        .ok_or_else(|| anyhow!("precache requires --out DIR\n\n{}", usage()))?;
    let (itinerary, config) = args.load()?;
    let source = UrlTemplateSource::new(config.tiles.url_template.clone());
    let requests =
        collect_tile_requests(&itinerary.days, &config.canvas, &config.zoom_search, &source)
            .context("collect tile requests")?;

    let directory = TileDirectory::new(out);
    let precacher = Precacher::from_config(HttpTileFetcher, &config.tiles);
    let (tx, rx) = crossbeam_channel::unbounded::<PrecacheProgress>();
    let reporter = thread::spawn(move || {
        for update in rx {
            log::info!(
                "tiles {}/{} ({} already cached){}",
                update.cached,
                update.total,
                update.already_cached,
                if update.done { ", done" } else { "" }
            );
        }
    });

    let result = directory.precache(&precacher, &requests, None, Some(&tx));
    drop(tx);
    reporter
        .join()
        .map_err(|_| anyhow!("progress reporter panicked"))?;
    let result = result.with_context(|| format!("write tiles to {out:?}"))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "tripId": itinerary.trip_id,
            "requested": requests.len(),
            "cached": result.cached,
            "alreadyCached": result.already_cached,
            "directory": directory.root().display().to_string(),
        }))?
    );
    Ok(())
}
