//! Command dispatch

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::GameStats;
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::{
    decode_value, escape, try_decode_value, unescape, ParseMode, PropValue, Property, Scanner,
    Token,
};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeConvert;

/// Run the selected command; returns the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let Some(command) = &cli.command else {
        return Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        ));
    };

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.strict {
        settings.mode = ParseMode::Strict;
    }
    debug!("settings: mode={:?}", settings.mode);
    let container = ServiceContainer::new(settings);
    let mut out = io::stdout().lock();

    match command {
        Commands::Tree { file } => cmd_tree(&container, file, &mut out),
        Commands::Info { file } => cmd_info(&container, file, &mut out),
        Commands::Fmt { file, output } => cmd_fmt(&container, file, output.as_deref(), &mut out),
        Commands::Tokens { file } => cmd_tokens(&container, file, &mut out),
        Commands::Props { file, all } => cmd_props(&container, file, *all, &mut out),
        Commands::Check { path } => cmd_check(&container, path, &mut out),
        Commands::Escape { text, simple } => emit(&mut out, &escape(text, *simple)),
        Commands::Unescape { text } => emit(&mut out, &unescape(text)),
        Commands::Config => emit(&mut out, container.settings.to_toml()?.trim_end()),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut out);
            Ok(exitcode::OK)
        }
    }
}

fn stdout_err(e: io::Error) -> InfraError {
    InfraError::io("write to stdout", e)
}

fn emit(out: &mut impl Write, text: &str) -> CliResult<i32> {
    writeln!(out, "{}", text).map_err(stdout_err)?;
    Ok(exitcode::OK)
}

#[instrument(level = "debug", skip(container, out))]
fn cmd_tree(container: &ServiceContainer, file: &Path, out: &mut impl Write) -> CliResult<i32> {
    let tree = container.games.load(file)?;
    emit(out, &tree.to_tree_string().to_string())
}

#[instrument(level = "debug", skip(container, out))]
fn cmd_info(container: &ServiceContainer, file: &Path, out: &mut impl Write) -> CliResult<i32> {
    let tree = container.games.load(file)?;
    let stats = GameStats::of(&tree);
    writeln!(out, "file:       {}", file.display()).map_err(stdout_err)?;
    writeln!(out, "games:      {}", stats.games).map_err(stdout_err)?;
    writeln!(out, "nodes:      {}", stats.nodes).map_err(stdout_err)?;
    writeln!(out, "main line:  {}", stats.main_line).map_err(stdout_err)?;
    writeln!(out, "depth:      {}", stats.depth).map_err(stdout_err)?;
    writeln!(out, "variations: {}", stats.variations).map_err(stdout_err)?;
    Ok(exitcode::OK)
}

#[instrument(level = "debug", skip(container, out))]
fn cmd_fmt(
    container: &ServiceContainer,
    file: &Path,
    output: Option<&Path>,
    out: &mut impl Write,
) -> CliResult<i32> {
    match output {
        Some(target) => {
            let tree = container.games.load(file)?;
            container.games.save(&tree, target)?;
            Ok(exitcode::OK)
        }
        None => emit(out, &container.games.normalize(file)?),
    }
}

#[instrument(level = "debug", skip(container, out))]
fn cmd_tokens(container: &ServiceContainer, file: &Path, out: &mut impl Write) -> CliResult<i32> {
    let text = container
        .fs
        .read_to_string(file)
        .with_path_context("read game record", file)?;

    for item in Scanner::new(&text) {
        let line = match item {
            Ok(spanned) => match spanned.token {
                Token::OpenBranch => format!("{:>8}  (", spanned.offset),
                Token::CloseBranch => format!("{:>8}  )", spanned.offset),
                Token::Node(node) => format!("{:>8}  {}", spanned.offset, node),
            },
            Err(e) => format!("{:>8}  {}", "-", e.to_string().yellow()),
        };
        writeln!(out, "{}", line).map_err(stdout_err)?;
    }
    Ok(exitcode::OK)
}

fn describe(value: &PropValue) -> String {
    match value {
        PropValue::None => "-".to_string(),
        PropValue::Number(n) | PropValue::Double(n) => n.to_string(),
        PropValue::Real(r) => r.to_string(),
        PropValue::Color(c) => c.as_str().to_string(),
        PropValue::SimpleText(t) | PropValue::Text(t) => format!("{:?}", t),
        PropValue::Point(x, y) => format!("({}, {})", x, y),
        PropValue::Points(p) => format!("{:?}", p),
        PropValue::Composed(a, b) => format!("{:?}:{:?}", a, b),
    }
}

fn describe_property(settings: &Settings, prop: &Property) -> CliResult<String> {
    let Some(ty) = settings.value_type(&prop.id) else {
        return Ok(prop.values.join(""));
    };
    let values: Vec<PropValue> = match settings.mode {
        ParseMode::Strict => prop
            .values
            .iter()
            .map(|raw| try_decode_value(raw, ty))
            .collect::<Result<_, _>>()
            .map_err(crate::application::ApplicationError::from)?,
        ParseMode::Lenient => prop.values.iter().map(|raw| decode_value(raw, ty)).collect(),
    };
    Ok(values.iter().map(describe).join(", "))
}

#[instrument(level = "debug", skip(container, out))]
fn cmd_props(
    container: &ServiceContainer,
    file: &Path,
    all: bool,
    out: &mut impl Write,
) -> CliResult<i32> {
    let tree = container.games.load(file)?;
    let nodes = if all {
        tree.iter().map(|(idx, _)| idx).collect::<Vec<_>>()
    } else {
        tree.main_line()
    };

    for (n, idx) in nodes.into_iter().enumerate() {
        let Some(game_node) = tree.get_node(idx) else {
            continue;
        };
        writeln!(out, "{}", format!("#{}", n).bold()).map_err(stdout_err)?;
        for prop in &game_node.node.properties {
            let text = describe_property(&container.settings, prop)?;
            writeln!(out, "  {:<4} {}", prop.id, text).map_err(stdout_err)?;
        }
    }
    Ok(exitcode::OK)
}

#[instrument(level = "debug", skip(container, out))]
fn cmd_check(container: &ServiceContainer, path: &Path, out: &mut impl Write) -> CliResult<i32> {
    let reports = container.games.check(path)?;
    let failed = reports.iter().filter(|r| !r.is_ok()).count();

    for report in &reports {
        let line = match &report.result {
            Ok(stats) => format!(
                "{} {} ({} nodes, {} variations)",
                "OK  ".green(),
                report.path.display(),
                stats.nodes,
                stats.variations
            ),
            Err(e) => format!("{} {}", "FAIL".red(), e),
        };
        writeln!(out, "{}", line).map_err(stdout_err)?;
    }
    writeln!(out, "{} file(s), {} failed", reports.len(), failed).map_err(stdout_err)?;

    Ok(if failed > 0 {
        exitcode::INVALID
    } else {
        exitcode::OK
    })
}
