// Copyright 2019-2020 koushiro. Licensed under MIT.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flvfix::{Amf0Value, FlvTagType};
use prettytable::{format, row, Attr, Cell, Row, Table};

#[derive(Debug, Parser)]
#[command(author, about, version)]
struct Opt {
    /// Increases log verbosity; repeat for more detail (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse an FLV file and print its header, tags and summary counts.
    Inspect {
        /// The input FLV file to parse.
        input: PathBuf,
    },
    /// Produce a byte-exact repaired copy, dropping any truncated trailing tag.
    Repair {
        /// The input FLV file to repair.
        input: PathBuf,
        /// Where to write the repaired file.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Replace the `onMetaData` script tag with caller-supplied key/value pairs.
    Rewrite {
        /// The input FLV file to rewrite.
        input: PathBuf,
        /// Where to write the rewritten file.
        #[arg(short, long)]
        output: PathBuf,
        /// A `key=value` pair to set in the replacement metadata map.
        /// May be repeated. Values parse as a number, `true`/`false`, or a string.
        #[arg(long = "set", value_parser = parse_key_value)]
        set: Vec<(String, Amf0Value)>,
    },
}

fn parse_key_value(s: &str) -> Result<(String, Amf0Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", s))?;
    let value = if let Ok(n) = value.parse::<f64>() {
        Amf0Value::Number(n)
    } else if value == "true" {
        Amf0Value::Boolean(true)
    } else if value == "false" {
        Amf0Value::Boolean(false)
    } else {
        Amf0Value::String(value.to_string())
    };
    Ok((key.to_string(), value))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::parse();

    let level = match opt.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    match opt.command {
        Command::Inspect { input } => {
            let contents = fs::read(input)?;
            let flv = flvfix::parse(&contents, "cli")?;
            print_tables(&flv);
        }
        Command::Repair { input, output } => {
            let contents = fs::read(input)?;
            let repaired = flvfix::repair(&contents)?;
            fs::write(output, repaired)?;
        }
        Command::Rewrite { input, output, set } => {
            let contents = fs::read(input)?;
            let map: BTreeMap<String, Amf0Value> = set.into_iter().collect();
            let rewritten = flvfix::rewrite_metadata(&contents, &map)?;
            fs::write(output, rewritten)?;
        }
    }

    Ok(())
}

fn print_tables(flv: &flvfix::FlvFile) {
    let mut header = Table::new();
    header.set_titles(Row::new(vec![
        Cell::new("FLV File Header").with_style(Attr::Bold)
    ]));
    header.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    header.add_row(row!("Signature (3B)", "F L V"));
    header.add_row(row!("Version (1B)", &format!("{}", flv.header.version)));
    header.add_row(row!("Has audio", &format!("{}", flv.header.has_audio)));
    header.add_row(row!("Has video", &format!("{}", flv.header.has_video)));
    header.add_row(row!(
        "Header size (4B)",
        &format!("{}", flv.header.header_size)
    ));
    header.printstd();

    let mut body = Table::new();
    body.set_titles(Row::new(vec![
        Cell::new("FLV File Body").with_style(Attr::Bold)
    ]));
    body.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    body.add_row(row!(
        "Index",
        "Offset",
        "TagType",
        "DataSize",
        "Timestamp",
        "Detail",
        "Analysis"
    ));

    let mut script_tag_num = 0usize;
    let mut video_tag_num = 0usize;
    let mut audio_tag_num = 0usize;
    for (index, tag) in flv.tags.iter().enumerate() {
        match tag.tag_type {
            FlvTagType::Script => script_tag_num += 1,
            FlvTagType::Video => video_tag_num += 1,
            FlvTagType::Audio => audio_tag_num += 1,
            FlvTagType::Unknown(_) => {}
        }
        body.add_row(Row::new(vec![
            Cell::new(&format!("{}", index + 1)),
            Cell::new(&format!("{}", tag.offset)),
            Cell::new(&format!("{:?}", tag.tag_type)),
            Cell::new(&format!("{}", tag.data_size)),
            Cell::new(&format!("{}", tag.timestamp)),
            Cell::new(&detail_summary(tag)),
            Cell::new(tag.analysis.as_deref().unwrap_or("")),
        ]));
    }
    body.printstd();

    let mut summary = Table::new();
    summary.set_titles(Row::new(vec![
        Cell::new("Total tags").with_style(Attr::Bold),
        Cell::new("Script tags").with_style(Attr::Bold),
        Cell::new("Video tags").with_style(Attr::Bold),
        Cell::new("Audio tags").with_style(Attr::Bold),
    ]));
    summary.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    summary.add_row(row!(
        &format!("{}", flv.tags.len()),
        &format!("{}", script_tag_num),
        &format!("{}", video_tag_num),
        &format!("{}", audio_tag_num),
    ));
    summary.printstd();
}

fn detail_summary(tag: &flvfix::FlvTag) -> String {
    use flvfix::TagDetails;
    match &tag.details {
        TagDetails::Audio(a) => format!("{} / {} / {}", a.format, a.sample_rate, a.channels),
        TagDetails::Video(v) => format!("{} / {}", v.frame_type, v.codec),
        TagDetails::Script(s) => format!("name={}", s.name),
        TagDetails::Unknown => "-".to_string(),
    }
}
