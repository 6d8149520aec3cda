use std::io::Write;

use fhf::{Font, Options, Warning};

pub type FileFont = Font<std::io::BufReader<std::fs::File>>;

#[derive(Clone, Debug)]
pub struct FontPath(pub std::path::PathBuf);

impl FontPath {
    fn parse(input: &str) -> Result<Self, String> {
        if input.is_empty() {
            return Err("the font path must not be empty".into());
        }
        Ok(FontPath(input.into()))
    }

    pub fn open_file(&self) -> Result<std::fs::File, String> {
        std::fs::File::open(&self.0)
            .map_err(|err| format!("Failed to read `{}`: {}", self.0.display(), err))
    }

    /// Opens the font.
    ///
    /// The library logs the returned warnings as it finds them.
    pub fn open(&self, options: Options) -> Result<(FileFont, Vec<Warning>), String> {
        let file = self.open_file()?;
        Font::open(std::io::BufReader::new(file), options)
            .map_err(|err| format!("Failed to open font `{}`: {}", self.0.display(), err))
    }
}

impl clap::builder::ValueParserFactory for FontPath {
    type Parser = clap::builder::ValueParser;

    fn value_parser() -> Self::Parser {
        clap::builder::ValueParser::new(FontPath::parse)
    }
}

/// Where an output is written: a file, or standard output for `-`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputPath {
    Stdout,
    File(std::path::PathBuf),
}

impl OutputPath {
    fn parse(input: &str) -> Result<Self, String> {
        match input {
            "" => Err("the output path must not be empty".into()),
            "-" => Ok(OutputPath::Stdout),
            path => Ok(OutputPath::File(path.into())),
        }
    }

    pub fn write(&self, content: &[u8]) -> Result<(), String> {
        match self {
            OutputPath::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(content)
                    .and_then(|()| stdout.flush())
                    .map_err(|err| format!("Failed to write to standard output: {err}"))
            }
            OutputPath::File(path) => match std::fs::write(path, content) {
                Ok(_) => Ok(()),
                Err(err) => Err(format!("Failed to write `{}`: {}", path.display(), err)),
            },
        }
    }
}

impl clap::builder::ValueParserFactory for OutputPath {
    type Parser = clap::builder::ValueParser;

    fn value_parser() -> Self::Parser {
        clap::builder::ValueParser::new(OutputPath::parse)
    }
}
