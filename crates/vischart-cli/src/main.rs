use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use vischart_contracts::charts::DisabledTools;
use vischart_contracts::envelope::ResponseEnvelope;
use vischart_engine::{Dispatcher, ServiceConfig};

#[derive(Debug, Parser)]
#[command(name = "vischart", version, about = "Chart and map generation tool dispatcher")]
struct Cli {
    /// Chart and map API endpoint.
    #[arg(long, global = true)]
    vis_request_server: Option<String>,
    #[arg(long, global = true)]
    service_id: Option<String>,
    /// Rendering service used when local candlestick rendering fails.
    #[arg(long, global = true)]
    render_service_url: Option<String>,
    #[arg(long, global = true)]
    upload_url: Option<String>,
    /// Comma separated tool names to hide and reject.
    #[arg(long, global = true)]
    disabled_tools: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read one JSON request per line from stdin and answer on stdout.
    Serve,
    /// Dispatch a single tool call.
    Call(CallArgs),
    /// Print the tool catalog.
    Tools,
}

#[derive(Debug, Parser)]
struct CallArgs {
    #[arg(long)]
    tool: String,
    #[arg(long, conflicts_with = "args_file")]
    args: Option<String>,
    #[arg(long)]
    args_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    #[serde(alias = "name")]
    tool: String,
    #[serde(default)]
    arguments: Map<String, Value>,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("vischart error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing();
    let config = cli.service_config(ServiceConfig::from_env());
    let dispatcher = Dispatcher::from_config(config)?;
    match cli.command {
        Command::Serve => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            serve(&dispatcher, stdin.lock(), stdout.lock())?;
            Ok(0)
        }
        Command::Call(args) => {
            let arguments = read_call_arguments(&args)?;
            let envelope = dispatcher.dispatch(&args.tool, arguments);
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(if envelope.is_error() { 2 } else { 0 })
        }
        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(&dispatcher.list_tools())?);
            Ok(0)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .try_init();
}

impl Cli {
    fn service_config(&self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(value) = non_empty(&self.vis_request_server) {
            config.vis_request_server = value.trim_end_matches('/').to_string();
        }
        if let Some(value) = non_empty(&self.service_id) {
            config.service_id = Some(value.to_string());
        }
        if let Some(value) = non_empty(&self.render_service_url) {
            config.render_service_url = Some(value.trim_end_matches('/').to_string());
        }
        if let Some(value) = non_empty(&self.upload_url) {
            config.upload_url = Some(value.to_string());
        }
        if let Some(value) = non_empty(&self.disabled_tools) {
            config.disabled_tools = DisabledTools::parse(value);
        }
        config
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn read_call_arguments(args: &CallArgs) -> Result<Map<String, Value>> {
    let raw = match (&args.args, &args.args_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => return Ok(Map::new()),
    };
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(&raw).context("arguments are not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("arguments must be a JSON object, got {other}"),
    }
}

/// Answers each non-blank input line with exactly one envelope line.
fn serve<R: BufRead, W: Write>(
    dispatcher: &Dispatcher,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let config = dispatcher.config();
    info!(
        vis_request_server = %config.vis_request_server,
        render_service = config.render_service_url.is_some(),
        "serving tool calls on stdin"
    );
    let mut raw = Vec::new();
    loop {
        raw.clear();
        let read = input
            .read_until(b'\n', &mut raw)
            .context("failed to read request line")?;
        if read == 0 {
            break;
        }
        let envelope = match std::str::from_utf8(&raw) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match serde_json::from_str::<ToolCall>(line) {
                Ok(call) => dispatcher.dispatch(&call.tool, call.arguments),
                Err(err) => {
                    debug!(error = %err, "malformed request line");
                    ResponseEnvelope::error(format!("Invalid request: {err}"))
                }
            },
            Err(err) => {
                debug!(error = %err, "request line is not UTF-8");
                ResponseEnvelope::error(format!("Invalid request: line is not valid UTF-8 ({err})"))
            }
        };
        serde_json::to_writer(&mut output, &envelope)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use clap::Parser;
    use serde_json::Value;
    use vischart_engine::{Dispatcher, ServiceConfig};

    use super::{read_call_arguments, serve, Cli, Command};

    #[test]
    fn global_flags_override_environment_config() -> Result<()> {
        let cli = Cli::try_parse_from([
            "vischart",
            "tools",
            "--vis-request-server",
            "http://vis.local/api/",
            "--service-id",
            "svc-9",
            "--disabled-tools",
            "generate_pie_chart",
        ])?;
        assert!(matches!(cli.command, Command::Tools));
        let config = cli.service_config(ServiceConfig {
            service_id: Some("from-env".to_string()),
            upload_url: Some("http://upload.local".to_string()),
            ..ServiceConfig::default()
        });
        assert_eq!(config.vis_request_server, "http://vis.local/api");
        assert_eq!(config.service_id.as_deref(), Some("svc-9"));
        assert_eq!(config.upload_url.as_deref(), Some("http://upload.local"));
        assert!(config.disabled_tools.contains("generate_pie_chart"));
        Ok(())
    }

    #[test]
    fn call_rejects_inline_and_file_arguments_together() {
        let parsed = Cli::try_parse_from([
            "vischart",
            "call",
            "--tool",
            "generate_line_chart",
            "--args",
            "{}",
            "--args-file",
            "args.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn call_arguments_load_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("args.json");
        fs::write(&path, r#"{ "type": "line", "data": [] }"#)?;
        let cli = Cli::try_parse_from([
            "vischart",
            "call",
            "--tool",
            "generate_chart",
            "--args-file",
            path.to_str().unwrap_or_default(),
        ])?;
        let Command::Call(args) = cli.command else {
            panic!("expected call");
        };
        let arguments = read_call_arguments(&args)?;
        assert_eq!(arguments.get("type"), Some(&Value::from("line")));
        Ok(())
    }

    #[test]
    fn call_arguments_must_be_an_object() -> Result<()> {
        let cli = Cli::try_parse_from(["vischart", "call", "--tool", "x", "--args", "[1]"])?;
        let Command::Call(args) = cli.command else {
            panic!("expected call");
        };
        assert!(read_call_arguments(&args).is_err());
        Ok(())
    }

    #[test]
    fn serve_keeps_going_after_a_non_utf8_line() -> Result<()> {
        let dispatcher = Dispatcher::from_config(ServiceConfig::default())?;
        let mut input = b"{\"tool\":\"generate_pizza\"}\n".to_vec();
        input.extend_from_slice(b"\xff\xfe bad\n");
        input.extend_from_slice(b"{\"tool\":\"generate_pizza\"}");
        let mut output = Vec::new();
        serve(&dispatcher, input.as_slice(), &mut output)?;

        let lines: Vec<Value> = String::from_utf8(output)?
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?;
        assert_eq!(lines.len(), 3);
        let texts: Vec<&str> = lines
            .iter()
            .map(|line| line["content"][0]["text"].as_str().unwrap_or_default())
            .collect();
        assert!(texts[0].contains("Unknown tool: generate_pizza"));
        assert!(texts[1].starts_with("Invalid request: line is not valid UTF-8"));
        assert!(texts[2].contains("Unknown tool: generate_pizza"));
        Ok(())
    }

    #[test]
    fn serve_answers_every_line_including_malformed_ones() -> Result<()> {
        let dispatcher = Dispatcher::from_config(ServiceConfig::default())?;
        let input = concat!(
            "{\"tool\":\"generate_pizza_chart\",\"arguments\":{}}\n",
            "\n",
            "not json\n",
            "{\"name\":\"generate_chart\",\"arguments\":{}}\n",
        );
        let mut output = Vec::new();
        serve(&dispatcher, input.as_bytes(), &mut output)?;

        let lines: Vec<Value> = String::from_utf8(output)?
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?;
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line["isError"] == Value::Bool(true)));
        let first = lines[0]["content"][0]["text"].as_str().unwrap_or_default();
        assert!(first.contains("Unknown tool"));
        let second = lines[1]["content"][0]["text"].as_str().unwrap_or_default();
        assert!(second.starts_with("Invalid request: "));
        let third = lines[2]["content"][0]["text"].as_str().unwrap_or_default();
        assert!(third.contains("required"));
        Ok(())
    }
}
