use std::path::PathBuf;

pub const USAGE: &str = "Usage: credit-agent <TICKER OR COMPANY NAME> [--no-memo] [--out DIR] [--bundle FILE.json]\n\
\n\
Examples:\n  credit-agent AAPL\n  credit-agent \"Apple Inc\"\n  credit-agent MSFT --no-memo --out reports\n  credit-agent REF --bundle statements.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    /// Ticker or free-text company name
    pub query: String,
    pub memo: bool,
    pub out_dir: PathBuf,
    /// Score a local statement bundle instead of calling the provider
    pub bundle: Option<PathBuf>,
}

/// Parses everything after the program name. `None` means nothing to analyse.
pub fn parse_args(args: &[String]) -> Result<Option<CliArgs>, String> {
    let mut words = Vec::new();
    let mut memo = true;
    let mut out_dir = PathBuf::from(".");
    let mut bundle = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--no-memo" => memo = false,
            "--out" => {
                let dir = iter.next().ok_or("--out needs a directory")?;
                out_dir = PathBuf::from(dir);
            }
            "--bundle" => {
                let file = iter.next().ok_or("--bundle needs a file")?;
                bundle = Some(PathBuf::from(file));
            }
            "-h" | "--help" => return Ok(None),
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {}", flag)),
            word => words.push(word),
        }
    }

    let query = words.join(" ").trim().to_string();
    if query.is_empty() {
        return Ok(None);
    }

    Ok(Some(CliArgs {
        query,
        memo,
        out_dir,
        bundle,
    }))
}
