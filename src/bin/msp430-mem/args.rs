use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use msp430_mem::{
    AddressRange, ChecksumAlgorithm, IntelHexWriteOptions, LoadOptions, TiTextWriteOptions,
    load_file, write_intel_hex, write_ti_text,
};
use tracing::debug;

use super::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// TI-Text (@addr blocks, terminated by q)
    Titxt,
    /// Intel-HEX
    Ihex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChecksumArg {
    /// 16-bit byte sum
    Sum16,
    /// CRC-16 CCITT (init 0xFFFF)
    Crc16,
    /// CRC-32 IEEE
    Crc32,
}

impl From<ChecksumArg> for ChecksumAlgorithm {
    fn from(arg: ChecksumArg) -> Self {
        match arg {
            ChecksumArg::Sum16 => Self::ByteSum16,
            ChecksumArg::Crc16 => Self::Crc16Ccitt,
            ChecksumArg::Crc32 => Self::Crc32,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "msp430-mem", version)]
#[command(about = "Convert MSP430 memory images between ELF, Intel-HEX and TI-Text")]
pub struct Args {
    /// File to read (ELF, Intel-HEX or TI-Text)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// File to write
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Titxt)]
    pub format: OutputFormat,

    /// Report ELF sections and format detection on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a checksum of the loaded image
    #[arg(long, value_enum, value_name = "ALGORITHM")]
    pub checksum: Option<ChecksumArg>,

    /// Address range for --checksum: FIRST-LAST or START,LENGTH
    #[arg(long, requires = "checksum", value_name = "RANGE")]
    pub range: Option<AddressRange>,
}

impl Args {
    pub fn execute(&self) -> Result<(), CliError> {
        let options = LoadOptions {
            report_sections: self.verbose,
        };
        let image = load_file(&self.input, &options)?;
        debug!(
            "loaded {} segments, {} bytes from {}",
            image.len(),
            image.total_bytes(),
            self.input.display()
        );

        let output = match self.format {
            OutputFormat::Titxt => {
                println!("convert to TI Hex");
                write_ti_text(&image, &TiTextWriteOptions::default())
            }
            OutputFormat::Ihex => {
                println!("convert to Intel Hex");
                write_intel_hex(&image, &IntelHexWriteOptions::default())?
            }
        };
        std::fs::write(&self.output, output).map_err(|source| CliError::Write {
            path: self.output.display().to_string(),
            source,
        })?;

        if let Some(algorithm) = self.checksum {
            let sum = image.checksum(algorithm.into(), self.range);
            match self.range {
                Some(range) => println!("checksum {range}: {sum}"),
                None => println!("checksum: {sum}"),
            }
        }

        Ok(())
    }
}
