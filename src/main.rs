// Tue Jan 13 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use native_memory::{
    config::Config,
    memory::{Access, ScalarKind, Value},
    posix::{
        parse_file_mode, parse_map_mode, parse_map_prot, parse_open_mode, File, FileData, PlatformConstants,
    },
    utils::{self, parse_i64, scoped_timer, LoggingUtils},
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Inspect and modify memory-mapped files", long_about = None)]
struct Args {
    /// JSON file with open and map defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show file size and host constants
    Info { file: PathBuf },

    /// Read one scalar
    Peek {
        file: PathBuf,
        #[arg(value_parser = parse_i64)]
        address: i64,
        #[arg(short, long, default_value = "int")]
        kind: ScalarKind,
        #[arg(short, long, default_value = "aligned")]
        access: Access,
    },

    /// Write one scalar
    Poke {
        file: PathBuf,
        #[arg(value_parser = parse_i64)]
        address: i64,
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(short, long, default_value = "int")]
        kind: ScalarKind,
        #[arg(short, long, default_value = "aligned")]
        access: Access,
    },

    /// Atomically replace a scalar if it holds the expected value
    Cas {
        file: PathBuf,
        #[arg(value_parser = parse_i64)]
        address: i64,
        #[arg(allow_hyphen_values = true)]
        expected: String,
        #[arg(allow_hyphen_values = true)]
        new: String,
        #[arg(short, long, default_value = "int")]
        kind: ScalarKind,
    },

    /// Zero the bytes in [from, until)
    Clear {
        file: PathBuf,
        #[arg(value_parser = parse_i64)]
        from: i64,
        #[arg(value_parser = parse_i64)]
        until: i64,
    },

    /// Copy bytes within the file, overlap allowed
    Move {
        file: PathBuf,
        #[arg(value_parser = parse_i64)]
        from: i64,
        #[arg(value_parser = parse_i64)]
        to: i64,
        #[arg(value_parser = parse_i64)]
        length: i64,
    },

    /// Grow or shrink the file
    Resize {
        file: PathBuf,
        #[arg(value_parser = parse_i64)]
        size: i64,
    },

    /// Hex view of a byte range
    Dump {
        file: PathBuf,
        #[arg(long, default_value = "0", value_parser = parse_i64)]
        address: i64,
        #[arg(long, default_value = "256", value_parser = parse_i64)]
        length: i64,
    },

    /// Print the platform open/map/mode constants as JSON, or decode flag
    /// strings such as "RDWR|CREAT" to their numeric values
    Constants {
        #[arg(long)]
        open: Option<String>,
        #[arg(long)]
        map: Option<String>,
        #[arg(long)]
        prot: Option<String>,
        #[arg(long)]
        mode: Option<String>,
    },
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Failed to load config: {:#}", "[!]".red(), e);
            std::process::exit(2);
        }
    };

    let level = LoggingUtils::level_with_verbosity(config.level_filter(), args.verbose);
    if let Err(e) = LoggingUtils::init(level, config.log_file.as_deref()) {
        eprintln!("{} Failed to open log file: {}", "[!]".red(), e);
    }

    if let Err(e) = run(args.command, &config) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("reading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(path) = &args.log_file {
        config = config.with_log_file(path.clone());
    }
    Ok(config)
}

/// An open file and a mapping over all of it.
struct Mapped {
    _file: File,
    data: FileData,
}

fn map_file(path: &Path, config: &Config) -> Result<Mapped> {
    let file = File::open(path, config.open_mode(), config.file_mode())
        .with_context(|| format!("opening {}", path.display()))?;
    let size = usize::try_from(file.size()?).context("file too large to map")?;
    if size == 0 {
        bail!("{} is empty; resize it first", path.display());
    }

    // SAFETY: no MAP_FIXED, and the mapping is dropped before this process exits.
    let data = unsafe { FileData::map(0, size, config.map_prot(), config.map_mode(), &file, 0) }
        .with_context(|| format!("mapping {}", path.display()))?;
    Ok(Mapped { _file: file, data })
}

fn writable(config: &Config) -> Result<&Config> {
    if config.read_only {
        bail!("config is read-only; this command writes");
    }
    Ok(config)
}

fn read_only(config: &Config) -> Config {
    config.clone().with_read_only(true).with_create(false)
}

fn run(command: Command, config: &Config) -> Result<()> {
    let _timer = scoped_timer("command");

    match command {
        Command::Info { file } => {
            let config = read_only(config);
            let handle = File::open(&file, config.open_mode(), config.file_mode())
                .with_context(|| format!("opening {}", file.display()))?;
            let size = handle.size()?;
            let constants = PlatformConstants::get();
            println!("{} {}", "[*]".blue(), file.display());
            println!("  Size:      {} ({})", size, utils::format_bytes(size));
            println!("  Pages:     {}", size.div_ceil(constants.page_size as u64));
            println!("  Page size: {}", constants.page_size);
            println!("  Unit:      {}", native_memory::unit());
            println!("  File:      {:?}", handle);
        }

        Command::Peek { file, address, kind, access } => {
            let mapped = map_file(&file, &read_only(config))?;
            let value = mapped.data.region().load_value(kind, access, address)?;
            println!("{} {} {} @ 0x{:x} = {} (0x{:x})", "[+]".green(), access, kind, address, value, value.raw_bits());
        }

        Command::Poke { file, address, value, kind, access } => {
            let value = Value::parse(kind, &value).map_err(anyhow::Error::msg)?;
            let mapped = map_file(&file, writable(config)?)?;
            mapped.data.region().store_value(access, address, value)?;
            mapped.data.sync()?;
            println!("{} Stored {} {} @ 0x{:x}", "[+]".green(), kind, value, address);
        }

        Command::Cas { file, address, expected, new, kind } => {
            if !kind.supports_compare_and_swap() {
                bail!("compare-and-swap is not available for {}", kind);
            }
            let expected = Value::parse(kind, &expected).map_err(anyhow::Error::msg)?;
            let new = Value::parse(kind, &new).map_err(anyhow::Error::msg)?;
            let mapped = map_file(&file, writable(config)?)?;
            let region = mapped.data.region();
            let swapped = match region.compare_and_swap_value(address, expected, new) {
                Some(result) => result?,
                None => bail!("compare-and-swap is not available for {}", kind),
            };
            if swapped {
                mapped.data.sync()?;
                println!("{} Swapped {} -> {} @ 0x{:x}", "[+]".green(), expected, new, address);
            } else {
                let current = region.load_value(kind, Access::Volatile, address)?;
                println!("{} No swap: @ 0x{:x} holds {}", "[*]".yellow(), address, current);
            }
        }

        Command::Clear { file, from, until } => {
            let mapped = map_file(&file, writable(config)?)?;
            mapped.data.region().clear(from, until)?;
            mapped.data.sync()?;
            println!("{} Cleared [0x{:x}, 0x{:x})", "[+]".green(), from, until);
        }

        Command::Move { file, from, to, length } => {
            let mapped = map_file(&file, writable(config)?)?;
            mapped.data.region().move_bytes(from, to, length)?;
            mapped.data.sync()?;
            println!("{} Moved {} bytes 0x{:x} -> 0x{:x}", "[+]".green(), length, from, to);
        }

        Command::Resize { file, size } => {
            let size = u64::try_from(size).context("size must not be negative")?;
            let config = writable(config)?;
            let handle = File::open(&file, config.open_mode(), config.file_mode())
                .with_context(|| format!("opening {}", file.display()))?;
            let before = handle.size()?;
            handle.set_size(size)?;
            println!(
                "{} {}: {} -> {}",
                "[+]".green(),
                file.display(),
                utils::format_bytes(before),
                utils::format_bytes(size)
            );
        }

        Command::Dump { file, address, length } => {
            let mapped = map_file(&file, &read_only(config))?;
            let region = mapped.data.region();
            let available = (region.size() as i64).saturating_sub(address).max(0);
            let bytes = region.read_bytes(address, length.min(available))?;
            for (row, chunk) in bytes.chunks(16).enumerate() {
                let ascii: String = chunk
                    .iter()
                    .map(|b| if b.is_ascii_graphic() || *b == b' ' { *b as char } else { '.' })
                    .collect();
                println!(
                    "{}  {:<47}  {}",
                    format!("{:08x}", address + (row * 16) as i64).cyan(),
                    utils::hex_string_spaced(chunk),
                    ascii
                );
            }
        }

        Command::Constants { open, map, prot, mode } => {
            let mut decoded = false;
            if let Some(text) = open {
                print_flags("open", &text, parse_open_mode(&text).map(|f| f.bits() as i64))?;
                decoded = true;
            }
            if let Some(text) = map {
                print_flags("map", &text, parse_map_mode(&text).map(|f| f.bits() as i64))?;
                decoded = true;
            }
            if let Some(text) = prot {
                print_flags("prot", &text, parse_map_prot(&text).map(|f| f.bits() as i64))?;
                decoded = true;
            }
            if let Some(text) = mode {
                print_flags("mode", &text, parse_file_mode(&text).map(|f| f.bits() as i64))?;
                decoded = true;
            }
            if !decoded {
                println!("{}", PlatformConstants::get().to_json()?);
            }
        }
    }

    Ok(())
}

fn print_flags(label: &str, text: &str, bits: std::result::Result<i64, String>) -> Result<()> {
    let bits = bits.map_err(anyhow::Error::msg)?;
    println!("{} {} {} = {} (0x{:x}, 0o{:o})", "[+]".green(), label, text, bits, bits, bits);
    Ok(())
}
