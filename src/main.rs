//! versicle - USX chapter inspector

use std::collections::BTreeSet;
use std::fs;
use std::process::ExitCode;

use clap::Parser;

use versicle::{
    Content, ParseOptions, UnknownTagMode, contents_to_text, find_text_content_by_verse_numbers,
    parse_with_options,
};

#[derive(Parser)]
#[command(name = "versicle")]
#[command(version, about = "USX chapter parser", long_about = None)]
#[command(after_help = "EXAMPLES:
    versicle chapter.usx              Print the chapter's content tree as JSON
    versicle -i chapter.usx           Show a summary without the full tree
    versicle --strict chapter.usx     Fail on tags outside the supported dialect")]
struct Cli {
    /// Input USX file (one chapter)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Show a chapter summary instead of the JSON tree
    #[arg(short, long)]
    info: bool,

    /// Treat unknown tags as errors instead of warnings
    #[arg(long)]
    strict: bool,

    /// Prefix for generated node ids (e.g. "GEN.1.")
    #[arg(long, value_name = "PREFIX", default_value = "")]
    id_prefix: String,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let usx = fs::read_to_string(&cli.input).map_err(|e| format!("{}: {e}", cli.input))?;

    let options = ParseOptions {
        unknown_tags: if cli.strict {
            UnknownTagMode::Strict
        } else {
            UnknownTagMode::Lenient
        },
        id_prefix: cli.id_prefix.clone(),
    };

    let output = parse_with_options(&usx, &options).map_err(|e| e.to_string())?;

    for warning in &output.warnings {
        eprintln!("warning: {} at {}", warning.message, warning.position);
    }

    if cli.info {
        show_info(&cli.input, &output.contents);
        return Ok(());
    }

    let json = if cli.compact {
        serde_json::to_string(&output.contents)
    } else {
        serde_json::to_string_pretty(&output.contents)
    }
    .map_err(|e| e.to_string())?;
    println!("{json}");

    Ok(())
}

fn show_info(path: &str, contents: &[Content]) {
    fn count_nodes(nodes: &[Content]) -> usize {
        nodes.iter().map(|n| 1 + count_nodes(n.contents())).sum()
    }

    fn collect_verses(nodes: &[Content], verses: &mut BTreeSet<u32>) {
        for node in nodes {
            if let Content::Verse { number, .. } = node {
                verses.insert(*number);
            }
            collect_verses(node.contents(), verses);
        }
    }

    let mut verses = BTreeSet::new();
    collect_verses(contents, &mut verses);
    let text = contents_to_text(contents);
    let leaves = find_text_content_by_verse_numbers(contents, &verses);

    println!("File: {path}");
    println!("Top-level blocks: {}", contents.len());
    println!("Total nodes: {}", count_nodes(contents));
    match (verses.first(), verses.last()) {
        (Some(first), Some(last)) => println!("Verses: {} ({first}-{last})", verses.len()),
        _ => println!("Verses: 0"),
    }
    println!("Verse text leaves: {}", leaves.len());
    println!("Reading text: {} chars", text.chars().count());
}
