use anyhow::Result;
use clap::{Parser, Subcommand};
use dirc::areas::repository::Repository;
use dirc::artifacts::index::options::{DecodeOptions, PaddingMode, VersionField};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dirc",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Inspect the git staging-area index",
    long_about = "Decodes a git index (DIRC) file and prints its entries, extensions \
    and checksum. The file is only ever read.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Path to the index file (defaults to .git/index)"
    )]
    index: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Accept non-NUL bytes in entry padding"
    )]
    lenient: bool,
    #[arg(
        long,
        global = true,
        help = "Read only the low byte of the version field"
    )]
    version_low_byte: bool,
    #[arg(short, long, global = true, help = "Log what is being read to stderr")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "ls-files",
        about = "List the paths in the index",
        long_about = "This command lists every entry's path in index order. \
        With --stage it also prints the mode, object ID and merge stage."
    )]
    LsFiles {
        #[arg(short, long, help = "Show mode, object ID and stage")]
        stage: bool,
    },
    #[command(
        name = "show-index",
        about = "Print every field of the header and entries",
        long_about = "This command prints the header, every field of every entry \
        with human-readable timestamps, and the trailing checksum."
    )]
    ShowIndex,
    #[command(
        name = "verify",
        about = "Check the index checksum",
        long_about = "This command compares the trailing checksum with the SHA-1 of the file \
        and reports whether re-encoding the index reproduces it byte for byte."
    )]
    Verify,
    #[command(
        name = "extensions",
        about = "List the extension blocks",
        long_about = "This command lists each extension's signature and size, \
        with a summary of the extensions it understands."
    )]
    Extensions,
}

impl Cli {
    fn decode_options(&self) -> DecodeOptions {
        let mut options = DecodeOptions::default();
        if self.lenient {
            options = options.with_padding(PaddingMode::Lenient);
        }
        if self.version_low_byte {
            options = options.with_version_field(VersionField::LowByte);
        }
        options
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .format_timestamp(None)
        .parse_default_env()
        .try_init()?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let pwd = std::env::current_dir()?;
    let mut repository = Repository::new(
        &pwd.to_string_lossy(),
        cli.index.clone(),
        cli.decode_options(),
        Box::new(std::io::stdout()),
    )?;

    match &cli.command {
        Commands::LsFiles { stage } => repository.ls_files(*stage).await?,
        Commands::ShowIndex => repository.show_index().await?,
        Commands::Verify => repository.verify_index().await?,
        Commands::Extensions => repository.ls_extensions().await?,
    }

    Ok(())
}
