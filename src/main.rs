use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use nipzip::bit_vec::BitVec;
use nipzip::header::LookupTable;
use nipzip::HuffmanCodec;

/// Longest text shown in full by --verbose.
const PREVIEW_LIMIT: usize = 1000;

/// Huffman prefix-code compressor.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["source", "compress", "decompress"])))]
struct Cli {
    /// Source file: .txt/.py compresses, .bin decompresses
    #[arg(long, value_name = "SOURCE_FILE")]
    source: Option<PathBuf>,

    /// Destination file, defaults to the source path with a new extension
    #[arg(long, value_name = "DEST_FILE", requires = "source")]
    dest: Option<PathBuf>,

    /// Overwrite an existing destination without asking
    #[arg(short = 'o', long = "override")]
    overwrite: bool,

    /// Compress a string and print the container as a bit string
    #[arg(long, value_name = "TEXT")]
    compress: Option<String>,

    /// Decompress a bit string and print the text
    #[arg(long, value_name = "BITS")]
    decompress: Option<String>,

    /// Display the tree, code table and data
    #[arg(short, long)]
    verbose: bool,

    /// Display debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Compress,
    Decompress,
}

impl Mode {
    fn from_source(source: &Path) -> anyhow::Result<Self> {
        match extension(source).as_deref() {
            Some("bin") => Ok(Mode::Decompress),
            Some("txt") | Some("py") => Ok(Mode::Compress),
            _ => bail!(
                "unsupported source extension for '{}' (expected .txt, .py or .bin)",
                source.display()
            ),
        }
    }

    fn output_extension(self) -> &'static str {
        match self {
            Mode::Compress => "bin",
            Mode::Decompress => "txt",
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn destination(source: &Path, dest: Option<&Path>, mode: Mode) -> anyhow::Result<PathBuf> {
    match dest {
        Some(dest) if extension(dest).as_deref() != Some(mode.output_extension()) => {
            bail!(
                "invalid destination file extension for '{}' (expected .{})",
                dest.display(),
                mode.output_extension()
            )
        }
        Some(dest) => Ok(dest.to_path_buf()),
        None => Ok(source.with_extension(mode.output_extension())),
    }
}

/// Human readable size: divide by 1024 (rounding up) until at most three digits remain.
fn format_size(size: u64) -> String {
    const UNITS: [&str; 5] = ["bytes", "KB", "MB", "GB", "TB"];
    let mut size = size;
    let mut unit = 0;
    while size > 999 && unit < UNITS.len() - 1 {
        size = size.div_ceil(1024);
        unit += 1;
    }
    format!("{size}{}", UNITS[unit])
}

/// Ask until the answer is y or n.
fn confirm_override<R: BufRead, W: Write>(mut input: R, mut prompt: W) -> io::Result<bool> {
    let mut line = String::new();
    loop {
        write!(prompt, "Override file? (y/n): ")?;
        prompt.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => continue,
        }
    }
}

fn preview(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= PREVIEW_LIMIT {
        return text.to_string();
    }
    let half = PREVIEW_LIMIT / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}\n\t...\n{tail}")
}

fn print_banner(title: &str, body: &str) {
    let rule = format!("{}>", "=".repeat(20));
    println!("{title}\n{rule}\n{body}\n{rule}");
}

fn print_codec(codec: &HuffmanCodec) {
    print!("{}", codec.tree());
    println!("Encoding: {}", codec.mode());
}

fn print_lookup(lookup: &LookupTable) {
    println!("Lookup table generated:");
    for (index, (code, symbol)) in lookup.iter().enumerate() {
        let end = if (index + 1) % 4 == 0 { "\n" } else { "    " };
        print!("{symbol:?}: {code}{end}");
    }
    println!();
}

fn compress_text(text: &str, verbose: bool) -> anyhow::Result<Vec<u8>> {
    let codec = HuffmanCodec::new(text)
        .inspect_err(|err| debug!(category = err.category(), "compression failed"))
        .context("failed to build huffman code")?;
    if verbose {
        print_codec(&codec);
    }
    let packed = codec.encode(text).context("failed to encode text")?;
    if verbose {
        let bits = BitVec::from_bytes(&packed).to_bit_string();
        print_banner("Compressed data:", &preview(&bits));
    }
    Ok(packed)
}

fn decompress_container(bytes: &[u8], verbose: bool) -> anyhow::Result<String> {
    let (symbols, lookup) = HuffmanCodec::decode_symbols(bytes)
        .inspect_err(|err| debug!(category = err.category(), "decompression failed"))
        .context("failed to decode container")?;
    let text: String = symbols.into_iter().collect();
    if verbose {
        print_lookup(&lookup);
        print_banner("Uncompressed text:", &preview(&text));
    }
    Ok(text)
}

fn run_file(cli: &Cli, source: &Path) -> anyhow::Result<()> {
    if !source.exists() {
        bail!(
            "source file '{}' does not exist, check the full path",
            source.display()
        );
    }
    let mode = Mode::from_source(source)?;
    let dest = destination(source, cli.dest.as_deref(), mode)?;

    info!("Reading data from '{}'", source.display());
    let input = fs::read(source).with_context(|| format!("failed to read '{}'", source.display()))?;

    let output = match mode {
        Mode::Compress => {
            let text = String::from_utf8(input.clone())
                .with_context(|| format!("'{}' is not UTF-8 text", source.display()))?;
            compress_text(&text, cli.verbose)?
        }
        Mode::Decompress => decompress_container(&input, cli.verbose)?.into_bytes(),
    };

    if dest.exists() && !cli.overwrite {
        let stdin = io::stdin();
        if !confirm_override(stdin.lock(), io::stdout())? {
            info!("Can't write data to '{}'; exiting.", dest.display());
            return Ok(());
        }
    }

    info!("Writing to '{}'", dest.display());
    fs::write(&dest, &output).with_context(|| format!("failed to write '{}'", dest.display()))?;

    let verb = match mode {
        Mode::Compress => "Compressed",
        Mode::Decompress => "Decompressed",
    };
    println!(
        "{verb} {} -> {} ({} -> {})",
        source.display(),
        dest.display(),
        format_size(input.len() as u64),
        format_size(output.len() as u64)
    );
    Ok(())
}

fn run_string_compress(text: &str, verbose: bool) -> anyhow::Result<()> {
    let packed = compress_text(text, verbose)?;
    println!("{}", BitVec::from_bytes(&packed).to_bit_string());
    Ok(())
}

fn run_string_decompress(bits: &str, verbose: bool) -> anyhow::Result<()> {
    let bits = BitVec::from_bit_str(bits.trim()).context("not a binary string")?;
    if bits.len() % 8 != 0 {
        bail!("binary string length {} is not a whole number of bytes", bits.len());
    }
    let text = decompress_container(bits.as_bytes(), verbose)?;
    println!("{text}");
    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    debug!(?cli, "command parsed");

    if let Some(source) = cli.source.as_deref() {
        run_file(&cli, source)
    } else if let Some(text) = cli.compress.as_deref() {
        run_string_compress(text, cli.verbose)
    } else if let Some(bits) = cli.decompress.as_deref() {
        run_string_decompress(bits, cli.verbose)
    } else {
        bail!("provide a source file or a string, see --help")
    }
}
