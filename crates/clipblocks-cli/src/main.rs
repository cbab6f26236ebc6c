mod state;

use anyhow::{Context, Result, bail};
use clipblocks_config::Config;
use clipblocks_engine::{
    Conversion, ConvertOptions, DraftBlock, EditorNode, Reconciliation, convert_document,
    convert_text, drafts_from_editor, drafts_from_nodes, parse_text, reconcile,
};
use serde_json::json;
use std::{
    env,
    io::{self, Read},
    path::{Path, PathBuf},
    process,
};

use state::State;

const USAGE: &str = "Usage: clipblocks [--editor-json] [--nested] [--state] [--diagnostics] <file|->";

#[derive(Debug, Default, PartialEq)]
struct Args {
    input: Option<PathBuf>,
    editor_json: bool,
    nested: bool,
    state: bool,
    diagnostics: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    for arg in args {
        match arg.as_str() {
            "--editor-json" => parsed.editor_json = true,
            "--nested" => parsed.nested = true,
            "--state" => parsed.state = true,
            "--diagnostics" => parsed.diagnostics = true,
            flag if flag.starts_with("--") => bail!("Unknown option '{flag}'"),
            path if parsed.input.is_none() => parsed.input = Some(PathBuf::from(path)),
            extra => bail!("Unexpected argument '{extra}'"),
        }
    }
    if parsed.input.is_none() {
        bail!("No input given");
    }
    Ok(parsed)
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn main() -> Result<()> {
    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let mut options = config.convert.clone();
    options.diagnostics |= args.diagnostics;

    env_logger::Builder::from_default_env()
        .filter_level(if options.diagnostics {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let input = match &args.input {
        Some(path) => read_input(path)?,
        None => String::new(),
    };
    let output = run(&args, &config, &options, &input)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(
    args: &Args,
    config: &Config,
    options: &ConvertOptions,
    input: &str,
) -> Result<serde_json::Value> {
    if !args.editor_json && !args.nested && !args.state {
        let conversion = convert_text(input, options);
        return conversion_json(&conversion, None);
    }

    let drafts = drafts(args, options, input)?;
    let state = if args.state {
        let Some(dir) = &config.state_dir else {
            bail!(
                "--state needs state_dir in {}",
                Config::config_path().display()
            );
        };
        Some(State::load(dir)?)
    } else {
        None
    };

    let reconciliation = match &state {
        Some(state) => reconcile(&drafts, state.document.as_ref(), state.id_mapping.as_ref()),
        None => reconcile(&drafts, None, None),
    };
    if let Some(state) = &state {
        state.save(&reconciliation)?;
    }

    let conversion = convert_document(Some(&reconciliation.document), options);
    conversion_json(&conversion, Some(&reconciliation))
}

fn drafts(args: &Args, options: &ConvertOptions, input: &str) -> Result<Vec<DraftBlock>> {
    if args.editor_json {
        let nodes = EditorNode::from_json(input).context("Failed to read editor tree")?;
        Ok(drafts_from_editor(&nodes))
    } else {
        Ok(drafts_from_nodes(&parse_text(input, &options.lexer)))
    }
}

fn conversion_json(
    conversion: &Conversion,
    reconciliation: Option<&Reconciliation>,
) -> Result<serde_json::Value> {
    let mut output = json!({
        "blocks": conversion.blocks_json()?,
        "report": &conversion.report,
    });
    if let Some(r) = reconciliation {
        output["changes"] = json!({
            "new": &r.new_block_ids,
            "modified": &r.modified_block_ids,
            "deleted": &r.deleted_block_ids,
        });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(&list.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn flags_and_path() {
        let parsed = args(&["--nested", "clip.md", "--diagnostics"]).unwrap();
        assert_eq!(
            parsed,
            Args {
                input: Some(PathBuf::from("clip.md")),
                nested: true,
                diagnostics: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(args(&[]).is_err());
        assert!(args(&["--verbose", "a.md"]).is_err());
        assert!(args(&["a.md", "b.md"]).is_err());
    }

    #[test]
    fn flat_output_has_flags() {
        let parsed = args(&["-"]).unwrap();
        let output = run(&parsed, &Config::default(), &ConvertOptions::default(), "- a\n  - b").unwrap();
        assert_eq!(output["blocks"][0]["has_children"], json!(true));
        assert_eq!(output["report"]["blocks_input"], json!(1));
        assert!(output.get("changes").is_none());
    }

    #[test]
    fn nested_output_reports_changes() {
        let parsed = args(&["--nested", "-"]).unwrap();
        let output = run(&parsed, &Config::default(), &ConvertOptions::default(), "- a\n  - b").unwrap();
        assert_eq!(output["blocks"].as_array().map(Vec::len), Some(1));
        assert_eq!(output["changes"]["new"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn state_without_dir_is_an_error() {
        let parsed = args(&["--state", "-"]).unwrap();
        assert!(run(&parsed, &Config::default(), &ConvertOptions::default(), "x").is_err());
    }

    #[test]
    fn editor_json_input() {
        let parsed = args(&["--editor-json", "-"]).unwrap();
        let output = run(
            &parsed,
            &Config::default(),
            &ConvertOptions::default(),
            r#"{"type": "divider", "id": "d"}"#,
        )
        .unwrap();
        assert_eq!(output["blocks"][0]["type"], json!("divider"));
    }
}
