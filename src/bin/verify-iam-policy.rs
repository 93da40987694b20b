use {
    anyhow::{Context, Result},
    clap::{Parser, ValueEnum},
    scratchstack_aspen_verify::{verify_file, FileOutcome, PrincipalPolicy, Verifier},
    serde_json::{json, Value},
    std::{
        io::{self, Write},
        path::PathBuf,
        process::ExitCode,
    },
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Verify that IAM policy documents do not grant wildcard resource access")]
struct Cli {
    /// Policy files to verify
    #[arg(default_value = "iam.json")]
    files: Vec<PathBuf>,

    /// Treatment of statements carrying a Principal field
    #[arg(long, value_enum, default_value_t = PrincipalArg::Reject)]
    principal: PrincipalArg,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log verification details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum PrincipalArg {
    Reject,
    Warn,
}

impl From<PrincipalArg> for PrincipalPolicy {
    fn from(arg: PrincipalArg) -> Self {
        match arg {
            PrincipalArg::Reject => Self::Reject,
            PrincipalArg::Warn => Self::Warn,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// The JSON report for one file.
fn report(file: &str, outcome: &FileOutcome) -> Value {
    match outcome {
        FileOutcome::Verified(verdict) => json!({
            "file": file,
            "safe": verdict.is_safe(),
            "error": null,
            "verdict": verdict,
        }),
        FileOutcome::Rejected(e) => json!({
            "file": file,
            "safe": false,
            "error": e,
            "verdict": null,
        }),
        FileOutcome::Unreadable(e) => json!({
            "file": file,
            "safe": false,
            "error": {"Kind": "Unreadable", "Message": e.to_string()},
            "verdict": null,
        }),
    }
}

fn write_text<W: Write>(out: &mut W, file: &str, outcome: &FileOutcome) -> io::Result<()> {
    writeln!(out, "Verifying {}:", file)?;
    match outcome {
        FileOutcome::Verified(verdict) => {
            for finding in verdict.findings() {
                writeln!(out, "Warning: {}", finding)?;
            }
            writeln!(out, "{}", verdict.is_safe())?;
        }
        FileOutcome::Rejected(e) => writeln!(out, "Error: {}", e)?,
        FileOutcome::Unreadable(e) => writeln!(out, "Error: {}", e)?,
    }
    writeln!(out)
}

fn write_json<W: Write>(out: &mut W, file: &str, outcome: &FileOutcome) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(&report(file, outcome)).with_context(|| format!("rendering report for {}", file))?;
    writeln!(out, "{}", rendered)?;
    Ok(())
}

/// Verify every configured file, writing reports to `out`. Returns whether all files were safe.
fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<bool> {
    let verifier = Verifier::builder().principal(cli.principal.into()).build().context("building verifier")?;
    log::debug!("Verifying {} file(s) with {:?}", cli.files.len(), verifier);

    let mut all_safe = true;
    for path in &cli.files {
        let file = path.display().to_string();
        let outcome = verify_file(&verifier, path);
        all_safe &= outcome.is_safe();

        match cli.format {
            Format::Text => write_text(out, &file, &outcome)?,
            Format::Json => write_json(out, &file, &outcome)?,
        }
    }

    Ok(all_safe)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let stdout = io::stdout();
    let all_safe = run(&cli, &mut stdout.lock())?;

    Ok(if all_safe {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
