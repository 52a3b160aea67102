mod cli;
mod error;

use std::sync::Arc;

use clap::Parser;
use pagedom::Document;
use seamless_lib::{FilterConfig, FilterEngine, HttpFetcher, PageFetcher};
use simplelog::{Config, LevelFilter, WriteLogger};
use url::Url;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(level, Config::default(), std::io::stderr())?;

    let mut config = match &cli.config {
        Some(path) => FilterConfig::from_json_file(path)?,
        None => FilterConfig::default(),
    };
    if cli.debug {
        config = config.debug(true);
    }
    let fetcher = Arc::new(HttpFetcher::new(&config)?);

    let (html, page_url) = match &cli.source.url {
        Some(raw) => {
            let url = parse_url(raw)?;
            log::info!("fetching {url}");
            (fetcher.fetch(&url).await?, Some(url))
        }
        None => {
            let path = cli.source.file.clone().unwrap_or_default();
            let html = std::fs::read_to_string(&path)
                .map_err(|source| CliError::Input { path, source })?;
            (html, None)
        }
    };
    let location = match &cli.location {
        Some(raw) => Some(parse_url(raw)?),
        None => page_url,
    };

    let mut engine = FilterEngine::new(Document::parse_html(&html), config);
    if let Some(location) = location {
        engine = engine.with_location(location);
    }

    if !cli.no_paginate {
        engine.load_all_paginated_items(fetcher).await;
    }

    if let (Some(group), Some(query)) = (&cli.group, &cli.query) {
        engine.filter_group(group, query);
    }
    engine.flush_updates();

    for (name, group) in engine.groups() {
        if cli.group.as_ref().is_some_and(|selected| selected != name) {
            continue;
        }
        for item in group.items.iter().filter(|item| item.is_visible) {
            println!("{name}\t{}", item.label_text);
        }
    }

    if cli.stats {
        println!("{}", serde_json::to_string_pretty(&engine.cache_stats())?);
    }
    Ok(())
}

fn parse_url(raw: &str) -> Result<Url, CliError> {
    Url::parse(raw).map_err(|source| CliError::Url {
        url: raw.to_string(),
        source,
    })
}
