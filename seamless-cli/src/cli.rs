use std::path::PathBuf;

use clap::{Args, Parser};

#[derive(Parser, Debug)]
#[command(name = "seamless-cli")]
#[command(about = "Index, paginate and filter the checkbox lists of a CMS page", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub source: Source,

    /// URL relative pagination links resolve against (defaults to the page URL)
    #[arg(long)]
    pub location: Option<String>,

    /// Group to filter
    #[arg(short, long, requires = "query")]
    pub group: Option<String>,

    /// Query applied to the group
    #[arg(short, long, requires = "group")]
    pub query: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print cache statistics as JSON
    #[arg(long)]
    pub stats: bool,

    /// Skip loading the remaining pages of seamless lists
    #[arg(long)]
    pub no_paginate: bool,

    /// Verbose engine logging
    #[arg(long)]
    pub debug: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Source {
    /// Page to fetch
    pub url: Option<String>,

    /// Local HTML file to read instead of fetching
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}
