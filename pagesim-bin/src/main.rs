use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use log::info;

use pagesim_bin::init_logging;
use pagesim_bin::shell::{Answer, Shell, TokenReader, ask};
use pagesim_core::{JobRegistry, PagerConfig, SelectionPolicy};

/// CLI arguments for the `pagesim` binary.
///
/// Values given on the command line override those of the config file. Page
/// size and frame count that are given nowhere are prompted for.
#[derive(Debug, Parser, Clone)]
#[clap(about = "Paged memory allocation simulator")]
struct CliArgs {
    /// JSON config file with `page_size`, `total_frames`, `policy` and `seed`.
    #[clap(long = "config")]
    config: Option<String>,
    /// Bytes per page and frame.
    #[clap(long = "page-size", allow_negative_numbers = true)]
    page_size: Option<i64>,
    /// Number of frames in the memory pool.
    #[clap(long = "frames", allow_negative_numbers = true)]
    frames: Option<i64>,
    /// Seed for randomized frame selection.
    #[clap(long = "seed")]
    seed: Option<u64>,
    /// Frame selection policy.
    #[clap(long = "policy", value_enum)]
    policy: Option<Policy>,
    /// Render the memory state as JSON.
    #[clap(long = "json")]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    Scatter,
    LowestFirst,
}

impl From<Policy> for SelectionPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Scatter => SelectionPolicy::Scatter,
            Policy::LowestFirst => SelectionPolicy::LowestFirst,
        }
    }
}

fn prompt_dimension<R: BufRead, W: Write>(
    reader: &mut TokenReader<R>,
    output: &mut W,
    prompt: &str,
) -> Result<i64> {
    match ask::<_, _, i64>(reader, output, prompt)? {
        Answer::Value(value) => Ok(value),
        Answer::Invalid(token) => bail!("Invalid configuration value '{}'", token),
        Answer::Eof => bail!("Input ended before the memory was configured"),
    }
}

fn resolve_config<R: BufRead, W: Write>(
    args: &CliArgs,
    reader: &mut TokenReader<R>,
    output: &mut W,
) -> Result<PagerConfig> {
    let file = args
        .config
        .as_ref()
        .map(|path| PagerConfig::from_jsonfile(path))
        .transpose()?;
    let page_size = match args.page_size.or(file.map(|c| c.page_size() as i64)) {
        Some(page_size) => page_size,
        None => prompt_dimension(reader, output, "Enter page size (bytes): ")?,
    };
    let frames = match args.frames.or(file.map(|c| c.total_frames() as i64)) {
        Some(frames) => frames,
        None => prompt_dimension(reader, output, "Enter total number of page frames: ")?,
    };
    let policy = args
        .policy
        .map(SelectionPolicy::from)
        .or(file.map(|c| c.policy()))
        .unwrap_or_default();
    let config = PagerConfig::new(page_size, frames)?.with_policy(policy);
    Ok(match args.seed.or(file.and_then(|c| c.seed())) {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

fn main() -> Result<()> {
    init_logging()?;

    let args = CliArgs::parse();
    info!("CLI args: {:?}", args);

    let stdin = io::stdin();
    let mut reader = TokenReader::new(stdin.lock());
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "=== Paged Memory Allocation Simulator ===")?;
    let config = match resolve_config(&args, &mut reader, &mut stdout) {
        Ok(config) => config,
        Err(e) => {
            writeln!(stdout, "Error: {}", e)?;
            stdout.flush()?;
            std::process::exit(1);
        }
    };
    info!("Configuration: {:?}", config);

    let mut shell = Shell::new(JobRegistry::new(config), reader, stdout).with_json(args.json);
    shell.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn resolve(argv: &[&str], input: &str) -> (Result<PagerConfig>, String) {
        let args = CliArgs::parse_from(std::iter::once("pagesim").chain(argv.iter().copied()));
        let mut reader = TokenReader::new(Cursor::new(input.to_string()));
        let mut out = Vec::new();
        let config = resolve_config(&args, &mut reader, &mut out);
        (config, String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn test_prompts_for_missing_dimensions() {
        let (config, out) = resolve(&[], "1024\n8\n");
        let config = config.expect("valid config");
        assert_eq!(config.page_size(), 1024);
        assert_eq!(config.total_frames(), 8);
        assert_eq!(
            out,
            "Enter page size (bytes): Enter total number of page frames: "
        );
    }

    #[test]
    fn test_cli_values() {
        let (config, out) = resolve(
            &["--page-size", "100", "--frames", "2", "--seed", "5", "--policy", "lowest-first"],
            "",
        );
        let config = config.expect("valid config");
        assert_eq!(config.memory_size(), 200);
        assert_eq!(config.seed(), Some(5));
        assert_eq!(config.policy(), SelectionPolicy::LowestFirst);
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_configuration() {
        let (config, _) = resolve(&["--page-size", "-1", "--frames", "2"], "");
        assert!(config.unwrap_err().to_string().starts_with("Invalid configuration"));
        let (config, _) = resolve(&["--frames", "2"], "abc\n");
        assert!(config.is_err());
        let (config, _) = resolve(&[], "");
        assert!(config.is_err());
    }

    #[test]
    fn test_oversized_memory_is_invalid() {
        let (config, _) = resolve(&[], "9223372036854775807\n4\n");
        assert!(config.unwrap_err().to_string().starts_with("Invalid configuration"));
        let (config, _) = resolve(&["--page-size", "1", "--frames", "9223372036854775807"], "");
        assert!(config.unwrap_err().to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_config_file_with_override() -> Result<()> {
        let path = std::env::temp_dir().join(format!("pagesim-cli-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"page_size": 256, "total_frames": 4, "seed": 9}"#)?;
        let path_str = path.to_string_lossy().to_string();
        let (config, _) = resolve(&["--config", &path_str, "--frames", "16"], "");
        std::fs::remove_file(&path)?;
        let config = config?;
        assert_eq!(config.page_size(), 256);
        assert_eq!(config.total_frames(), 16);
        assert_eq!(config.seed(), Some(9));
        assert_eq!(config.policy(), SelectionPolicy::Scatter);
        Ok(())
    }
}
