//! wavhide - hide files inside PCM WAV audio via masked LSB steganography.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::RngCore;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use wavhide::archive::{self, SourceFile};
use wavhide::config;
use wavhide::detect;
use wavhide::mask::Mask;
use wavhide::stego;
use wavhide::WavFile;

/// Exit code for missing inputs and decode failures.
const EXIT_USAGE: i32 = 2;

#[derive(Parser)]
#[command(name = "wavhide")]
#[command(author, version)]
#[command(about = "Hide files inside PCM WAV audio with masked LSB steganography")]
struct Cli {
    /// Input WAV file
    #[arg(short, long)]
    input: PathBuf,

    /// Use the gzip compression layer when writing or reading
    #[arg(short, long)]
    compress: bool,

    /// Print the list of files embedded in the input WAV
    #[arg(short = 'g', long)]
    listing: bool,

    /// Print the listing as JSON
    #[arg(long, requires = "listing")]
    json: bool,

    /// Print the storage capacity of the input WAV under the mask
    #[arg(short, long)]
    storage: bool,

    /// Output directory for extracted files
    #[arg(short = 'd', long, default_value = "unpack")]
    outdir: PathBuf,

    /// Mask selecting which channel units carry payload bits
    #[arg(short, long, default_value = config::DEFAULT_MASK, conflicts_with = "password")]
    mask: String,

    /// Password the mask is derived from
    #[arg(short, long)]
    password: Option<String>,

    /// Append diagnostics to the log file
    #[arg(short = 'l', long)]
    log: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed files into the input WAV
    Write {
        /// Comma-separated list of files to embed
        #[arg(short, long, value_delimiter = ',', required = true)]
        files: Vec<PathBuf>,

        /// Output WAV file
        #[arg(short, long, default_value = "out.wav")]
        output: PathBuf,

        /// Randomize the LSB of skipped channel units
        #[arg(short, long)]
        noise: bool,

        /// Skip the warning when input and output are the same file
        #[arg(short = 'w', long)]
        no_warnings: bool,
    },

    /// Extract embedded files from the input WAV into the output directory
    Read,

    /// Brute-force the embedding mask using a UTF-8 heuristic
    Detect {
        /// Largest mask length to try
        #[arg(long, default_value_t = 8)]
        max_len: usize,

        /// Probe buffer size in bytes
        #[arg(long, default_value_t = 100)]
        buffer: usize,

        /// Non-UTF-8 buffers tolerated per candidate
        #[arg(long, default_value_t = 3)]
        rejects: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.log {
        if let Err(e) = init_logging() {
            eprintln!("warning: could not open {}: {}", config::LOG_FILE, e);
        }
    }

    if let Err(e) = run(cli) {
        if matches!(
            e.downcast_ref::<wavhide::Error>(),
            Some(wavhide::Error::Decoding)
        ) {
            eprintln!("Decoding error, try change mask or password");
            std::process::exit(EXIT_USAGE);
        }
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging() -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config::LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mask = resolve_mask(&cli)?;

    if cli.storage {
        cmd_storage(&cli.input, &mask)?;
    }
    if cli.listing {
        cmd_listing(&cli.input, &mask, cli.compress, cli.json)?;
    }

    match &cli.command {
        Some(Commands::Write {
            files,
            output,
            noise,
            no_warnings,
        }) => cmd_write(&cli, files, output, *noise, *no_warnings, &mask),
        Some(Commands::Read) => cmd_read(&cli, &mask),
        Some(Commands::Detect {
            max_len,
            buffer,
            rejects,
        }) => cmd_detect(&cli.input, *max_len, *buffer, *rejects),
        None => Ok(()),
    }
}

fn resolve_mask(cli: &Cli) -> Result<Mask> {
    let mask = match &cli.password {
        Some(password) => Mask::from_password(password)?,
        None => cli.mask.parse()?,
    };
    Ok(mask)
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("cannot open input file {}", path.display()))
}

fn cmd_storage(input: &Path, mask: &Mask) -> Result<()> {
    let wav = WavFile::open(open_input(input)?)?;
    println!("{}", stego::storage_size(wav.params(), mask));
    Ok(())
}

fn cmd_listing(input: &Path, mask: &Mask, compress: bool, json: bool) -> Result<()> {
    let manifest = archive::list(open_input(input)?, mask, compress)?;
    if json {
        println!("{}", serde_json::to_string(manifest.entries())?);
    } else {
        for entry in manifest.entries() {
            println!("{}\t{}", entry.size, entry.name);
        }
    }
    Ok(())
}

fn cmd_write(
    cli: &Cli,
    files: &[PathBuf],
    output: &Path,
    noise: bool,
    no_warnings: bool,
    mask: &Mask,
) -> Result<()> {
    for file in files {
        if !file.exists() {
            eprintln!(
                "Sorry, but input binary file {} doesn't exist",
                file.display()
            );
            std::process::exit(EXIT_USAGE);
        }
    }

    let same_io = output == cli.input.as_path();
    if same_io && !no_warnings && !confirm_overwrite()? {
        std::process::exit(0);
    }

    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        let data =
            fs::read(file).with_context(|| format!("cannot read {}", file.display()))?;
        sources.push(SourceFile::new(name, data));
    }

    // When rewriting in place, go through a temporary and rename on success.
    let target = if same_io {
        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        dir.join("tmp.wav")
    } else {
        output.to_path_buf()
    };

    {
        let input = open_input(&cli.input)?;
        let out_file = File::create(&target)
            .with_context(|| format!("cannot create {}", target.display()))?;
        let mut rng = rand::thread_rng();
        let noise_source: Option<&mut dyn RngCore> =
            if noise { Some(&mut rng) } else { None };
        archive::pack(input, out_file, &sources, mask, cli.compress, noise_source)?;
    }

    if same_io {
        fs::rename(&target, output)
            .with_context(|| format!("cannot replace {}", output.display()))?;
    }
    Ok(())
}

fn confirm_overwrite() -> Result<bool> {
    print!("Input and output files are same. Do you want to continue? [y/n] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim() == "y")
}

fn cmd_read(cli: &Cli, mask: &Mask) -> Result<()> {
    if !cli.outdir.is_dir() {
        eprintln!(
            "Sorry, but output directory {} doesn't exist",
            cli.outdir.display()
        );
        std::process::exit(EXIT_USAGE);
    }

    let files = archive::unpack(open_input(&cli.input)?, mask, cli.compress)?;
    for file in &files {
        let name = Path::new(&file.name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("unnamed"));
        let path = cli.outdir.join(name);
        fs::write(&path, &file.data)
            .with_context(|| format!("cannot write {}", path.display()))?;
    }
    Ok(())
}

fn cmd_detect(input: &Path, max_len: usize, buffer: usize, rejects: usize) -> Result<()> {
    let found = detect::search_mask(|| File::open(input), max_len, rejects, buffer)?;
    match found {
        Some(mask) => println!("mask = {mask}"),
        None => println!("no mask found"),
    }
    Ok(())
}
