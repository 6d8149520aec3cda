use clap::Parser;
use fhf::riff::ChunkHeader;

mod common;
mod output;
use common::*;

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .parse_default_env()
        .init();
    if let Err(err) = cli.run() {
        if !err.is_empty() {
            eprintln!("{err}");
        }
        std::process::exit(1);
    }
}

/// Tools for working with fixed-height bitmap fonts (.fhf files).
///
/// A fixed-height font is a RIFF container holding 16 pixel high glyphs
///     stored as columns of 16-bit words.
#[derive(Debug, Parser)]
#[command(
    name = "fhftools",
    version = "0.1",
    about,
    long_about,
    max_term_width(100)
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Most verbose log messages to print.
    ///
    /// `warning` and `fatal` are accepted as aliases of `warn` and `error`.
    /// The RUST_LOG environment variable takes precedence over this flag.
    #[arg(long, global = true, ignore_case = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum LogLevel {
    Off,
    #[value(alias = "fatal")]
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Cli {
    fn run(self) -> Result<(), String> {
        match self.command {
            Command::Check(check) => check.run(),
            Command::Convert(convert) => convert.run(),
            Command::View(view) => view.run(),
        }
    }
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
    /// Check that a .fhf file is valid.
    ///
    /// Besides the checks performed when opening the font,
    ///     every character map is read in full.
    /// Its records must be in ascending order
    ///     and every glyph id it contains must be stored in some glyph span.
    /// The command fails if any warning is found.
    Check(Check),

    /// Convert text into glyph bitmaps.
    ///
    /// The text is laid out with the font and written as C source:
    ///
    ///   $ fhftools convert path/to/font.fhf -c "Hello"
    ///
    /// The output declares three arrays.
    /// `bitmap` holds one 16-bit word per pixel column, bit i being row i.
    /// A blank column separates glyphs.
    /// `line_widths` and `line_ends` give the number of columns of each line
    ///     and the index one past its last column.
    ///
    /// Characters that are not in the font are skipped with a warning.
    /// Invalid UTF-8 in the text is an error.
    Convert(Convert),

    /// Print the chunk tree of a .fhf file.
    ///
    /// Every chunk is printed with its size and the offset of its header.
    /// List chunks also show their list type, and their children are indented below them.
    View(View),
}

#[derive(Clone, Debug, Parser)]
struct Check {
    /// Path to the .fhf file to validate.
    path: FontPath,

    /// Oldest font format version to accept.
    #[arg(long, default_value_t = fhf::MIN_VERSION)]
    min_version: u16,
}

impl Check {
    fn run(&self) -> Result<(), String> {
        let options = fhf::Options {
            min_version: self.min_version,
            trace_walk: log::log_enabled!(log::Level::Debug),
        };
        let (mut font, open_warnings) = self.path.open(options)?;
        let metadata = font.metadata();
        println!("name: {}", metadata.name);
        println!("version: {}", metadata.version);
        let glyph_metadata = font.glyph_metadata();
        println!("max width: {}", glyph_metadata.max_width);
        println!("height: {}", glyph_metadata.height);
        for map in font.character_maps() {
            println!("{}: {} characters", map.chunk().tag, map.len());
        }
        println!("glyph spans: {}", font.glyph_store().spans().len());

        let check_warnings = font
            .check()
            .map_err(|err| format!("Failed to check `{}`: {}", self.path.0.display(), err))?;
        let num_warnings = open_warnings.len() + check_warnings.len();
        if num_warnings > 0 {
            Err(format!("Check failure: {} warnings", num_warnings))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum Format {
    /// C source declaring the bitmap and line arrays.
    C,
    /// A JSON object with `columns` and `lines` fields.
    Json,
}

#[derive(Clone, Debug, Parser)]
struct Convert {
    /// Path to the .fhf font.
    path: FontPath,

    /// Text to convert.
    #[arg(
        short = 'c',
        long = "chars",
        required_unless_present = "char_file",
        conflicts_with = "char_file"
    )]
    chars: Option<String>,

    /// Path to a file containing the text to convert.
    ///
    /// The file is used verbatim, so a trailing newline in the file ends a line.
    #[arg(short = 'C', long = "charfile")]
    char_file: Option<std::path::PathBuf>,

    /// Output path for the converted text, or - for standard output.
    ///
    /// If not provided the output is printed to standard output.
    #[arg(short, long)]
    output: Option<OutputPath>,

    /// Also write the bitmap as a PBM image to this path, or - for standard output.
    #[arg(long)]
    pbm_output: Option<OutputPath>,

    /// Format of the converted text.
    #[arg(long, value_enum, default_value_t = Format::C)]
    format: Format,

    /// Oldest font format version to accept.
    #[arg(long, default_value_t = fhf::MIN_VERSION)]
    min_version: u16,
}

impl Convert {
    fn run(&self) -> Result<(), String> {
        let output = self.output.clone().unwrap_or(OutputPath::Stdout);
        if output == OutputPath::Stdout && self.pbm_output == Some(OutputPath::Stdout) {
            return Err(
                "The converted text and the PBM image can't both be written to standard output"
                    .into(),
            );
        }
        let text: Vec<u8> = match (&self.chars, &self.char_file) {
            (Some(chars), _) => chars.clone().into_bytes(),
            (None, Some(path)) => std::fs::read(path)
                .map_err(|err| format!("Failed to read `{}`: {}", path.display(), err))?,
            (None, None) => return Err("Either --chars or --charfile must be provided".into()),
        };

        let options = fhf::Options {
            min_version: self.min_version,
            trace_walk: log::log_enabled!(log::Level::Debug),
        };
        let (mut font, _) = self.path.open(options)?;
        log::info!(
            "font name: {} version: {}",
            font.metadata().name,
            font.metadata().version
        );
        let (layout, _) = font
            .layout(&text)
            .map_err(|err| format!("Failed to convert the text: {err}"))?;

        let converted = match self.format {
            Format::C => output::c_source(&layout),
            Format::Json => output::json(&layout)?,
        };
        if let Some(pbm_output) = &self.pbm_output {
            pbm_output.write(&output::pbm(&layout))?;
        }
        output.write(converted.as_bytes())
    }
}

#[derive(Clone, Debug, Parser)]
struct View {
    /// Path to the .fhf file to view.
    path: FontPath,
}

impl View {
    fn run(&self) -> Result<(), String> {
        let mut stream = std::io::BufReader::new(self.path.open_file()?);
        let header = fhf::riff::open(&mut stream)
            .map_err(|err| format!("Failed to read `{}`: {}", self.path.0.display(), err))?;
        println!("RIFF size: {} form: {}", header.size, header.form);
        let mut print_chunk = |h: &ChunkHeader, depth: usize| {
            let chunk = h.chunk();
            print!(
                "{:indent$}- {} size: {} offset: {}",
                "",
                chunk.tag,
                chunk.size,
                chunk.offset,
                indent = 2 * depth
            );
            match h {
                ChunkHeader::List { list_type, .. } => println!(" type: {list_type}"),
                ChunkHeader::Plain(_) => println!(),
            }
        };
        fhf::riff::walk_list(&mut stream, header.size, &mut print_chunk)
            .map_err(|err| format!("Failed to read `{}`: {}", self.path.0.display(), err))
    }
}
