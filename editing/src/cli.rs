//! Command line driver: loads a timeline document, applies a sequence of
//! edits and prints the result.

use log::info;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::backend::MemoryBackend;
use crate::config::{EditorConfig, load_config};
use crate::editor::EditorService;
use crate::editor::handlers::edit_handler::EditMode;
use crate::error::EditError;
use crate::model::document::TimelineDocument;
use crate::model::field::TimingField;
use crate::model::time::{ClockTime, format_time};
use crate::pipeline::{JsonSink, Pipeline};

/// What a command does to its element.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EditOp {
    Set(TimingField),
    Edit(EditMode),
}

impl FromStr for EditOp {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimingField::from_str(s)
            .map(EditOp::Set)
            .or_else(|_| EditMode::from_str(s).map(EditOp::Edit))
            .map_err(|_| EditError::InvalidArgument(format!("Unknown operation '{}'", s)))
    }
}

/// One `<op> <element> <value>` triple.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EditCommand {
    pub op: EditOp,
    pub element: String,
    pub value: ClockTime,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CliArgs {
    pub document: PathBuf,
    pub config: Option<PathBuf>,
    pub commands: Vec<EditCommand>,
}

const USAGE: &str = "Usage: cli <timeline.json> [--config <file>] [<op> <element> <value>]...";

impl CliArgs {
    /// Parses `args` including the program name.
    pub fn parse(args: &[String]) -> Result<Self, EditError> {
        let mut rest = args.iter().skip(1);
        let document = rest
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| EditError::InvalidArgument(USAGE.to_string()))?;

        let mut config = None;
        let mut words = Vec::new();
        while let Some(arg) = rest.next() {
            if arg == "--config" {
                let path = rest.next().ok_or_else(|| {
                    EditError::InvalidArgument("--config needs a file".to_string())
                })?;
                config = Some(PathBuf::from(path));
            } else {
                words.push(arg.as_str());
            }
        }

        if words.len() % 3 != 0 {
            return Err(EditError::InvalidArgument(USAGE.to_string()));
        }
        let commands = words
            .chunks(3)
            .map(|chunk| {
                let value = chunk[2].parse::<ClockTime>().map_err(|e| {
                    EditError::InvalidArgument(format!("Invalid time '{}': {}", chunk[2], e))
                })?;
                Ok(EditCommand {
                    op: chunk[0].parse()?,
                    element: chunk[1].to_string(),
                    value,
                })
            })
            .collect::<Result<Vec<_>, EditError>>()?;

        Ok(Self {
            document,
            config,
            commands,
        })
    }
}

fn init_logging(config: &EditorConfig) {
    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    // A logger may already be installed by an embedding program.
    let _ = env_logger::Builder::from_env(env).try_init();
}

pub fn run(args: Vec<String>) -> Result<(), EditError> {
    let args = CliArgs::parse(&args)?;
    let config = load_config(args.config.as_deref());
    init_logging(&config);
    execute(&args, &config, &mut io::stdout())
}

/// Applies the commands of `args` and writes the edited document, then the
/// composition graph if configured, to `out`.
pub fn execute(
    args: &CliArgs,
    config: &EditorConfig,
    out: &mut (dyn Write + Send),
) -> Result<(), EditError> {
    let document = TimelineDocument::load(&args.document)?;
    let service = EditorService::from_document(&document, MemoryBackend::new())?;
    info!(
        "Loaded '{}' with {} elements",
        document.name,
        document.elements.len()
    );

    for command in &args.commands {
        let id = service.find_element(&command.element)?;
        let change = match command.op {
            EditOp::Set(field) => service.set_field(id, field, command.value)?,
            EditOp::Edit(mode) => service.edit(mode, id, command.value)?,
        };
        let timing = service.get_timing(id)?;
        info!(
            "{:?} '{}' at {}: {:?} (start {}, duration {})",
            command.op,
            command.element,
            format_time(command.value, config.timebase),
            change,
            format_time(timing.start, config.timebase),
            format_time(timing.duration, config.timebase)
        );
    }

    writeln!(out, "{}", service.to_document()?.to_json()?)?;
    if config.print_graph {
        let mut pipeline = Pipeline::new(Box::new(JsonSink::new(out)));
        pipeline.add_timeline(service.timeline())?;
        pipeline.commit()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_parse_commands_and_config() {
        let parsed = CliArgs::parse(&args(&[
            "cli",
            "timeline.json",
            "start",
            "a",
            "20",
            "--config",
            "editing.toml",
            "roll-end",
            "b",
            "40",
        ]))
        .unwrap();
        assert_eq!(parsed.document, PathBuf::from("timeline.json"));
        assert_eq!(parsed.config, Some(PathBuf::from("editing.toml")));
        assert_eq!(
            parsed.commands,
            vec![
                EditCommand {
                    op: EditOp::Set(TimingField::Start),
                    element: "a".to_string(),
                    value: 20,
                },
                EditCommand {
                    op: EditOp::Edit(EditMode::RollEnd),
                    element: "b".to_string(),
                    value: 40,
                },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_incomplete_command() {
        assert!(CliArgs::parse(&args(&["cli", "timeline.json", "start", "a"])).is_err());
        assert!(CliArgs::parse(&args(&["cli"])).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_op_and_bad_value() {
        assert!(CliArgs::parse(&args(&["cli", "t.json", "shuffle", "a", "1"])).is_err());
        assert!(CliArgs::parse(&args(&["cli", "t.json", "start", "a", "-1"])).is_err());
    }
}
