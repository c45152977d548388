use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use matrix1000::command;
use matrix1000::message::{is_edit_buffer_dump, is_single_program_dump};
use matrix1000::sysex::messages_to_bytes;
use matrix1000::{
    parse_sysex_file, BankDumpCapability, BankNumber, DeviceConfig, DiscoverableDevice, DumpKind,
    EditBufferCapability, Matrix1000, MidiChannel, Patch, ProgramDumpCapability, ProgramNumber,
    SysexMessage,
};

/// Inspect Oberheim Matrix 1000 sysex dumps and build messages for the device
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Device configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all patches in a sysex file
    List {
        /// Path to the sysex file
        sysex_file: PathBuf,

        /// Treat single patch data as edit buffer dumps instead of program dumps
        #[arg(long)]
        edit_buffer: bool,
    },
    /// Show the master parameters contained in a sysex file
    Settings {
        /// Path to the sysex file
        sysex_file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write the messages that request data from the device
    Request {
        /// What to request
        #[arg(value_enum)]
        what: RequestKind,

        /// Program (0-999) for `patch`, bank (0-9) for `bank`, channel (1-16) for `detect`
        number: Option<u16>,

        /// Output sysex file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Write the message that stores the edit buffer into a program slot
    Store {
        /// Target program (0-999)
        program: u16,

        /// Output sysex file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Re-frame a patch from a sysex file for upload
    Convert {
        /// Path to the sysex file
        sysex_file: PathBuf,

        /// Patch index in the file (0-indexed)
        patch_index: usize,

        /// Target program (0-999), preceded by a bank select. Without it the
        /// patch is sent to the edit buffer.
        #[arg(long)]
        program: Option<u16>,

        /// Rename the patch
        #[arg(long)]
        name: Option<String>,

        /// Output sysex file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RequestKind {
    EditBuffer,
    Patch,
    Bank,
    Settings,
    Detect,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DeviceConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => DeviceConfig::default(),
    };
    let mut matrix = Matrix1000::new(&config);

    match args.command {
        Commands::List {
            sysex_file,
            edit_buffer,
        } => {
            let messages = read_messages(&sysex_file)?;
            let kind = if edit_buffer {
                DumpKind::EditBuffer
            } else {
                DumpKind::Program
            };

            for (i, patch) in load_patches(&matrix, &messages, kind).iter().enumerate() {
                match patch.number() {
                    Some(number) => println!("{}: {} {}", i, number, patch.name()),
                    None => println!("{}: edit buffer {}", i, patch.name()),
                }
            }

            if matrix.is_bank_dump_finished(&messages) {
                println!("complete bank dump");
            }
        }
        Commands::Settings { sysex_file, json } => {
            let messages = read_messages(&sysex_file)?;
            let message = messages
                .iter()
                .find(|m| matrix.is_global_settings_dump(m))
                .ok_or_else(|| anyhow!("No master parameter dump in '{}'", sysex_file.display()))?;
            let settings = matrix.load_global_settings(message)?;

            if json {
                println!("{}", serde_json::to_string_pretty(settings)?);
            } else {
                for (def, value) in settings.iter() {
                    println!(
                        "{:<16} {:<28} {}",
                        def.category,
                        def.name,
                        def.format_value(value)
                    );
                }
            }
        }
        Commands::Request {
            what,
            number,
            output,
        } => {
            let messages = match what {
                RequestKind::EditBuffer => vec![matrix.request_edit_buffer_dump()],
                RequestKind::Settings => vec![matrix.request_global_settings()],
                RequestKind::Patch => {
                    let program = required(number, "program number")?;
                    matrix.request_patch(ProgramNumber::new(program)?)
                }
                RequestKind::Bank => {
                    let bank = required(number, "bank number")?;
                    let bank = u8::try_from(bank).map_err(|_| anyhow!("bank {} out of range", bank))?;
                    matrix.request_bank_dump(BankNumber::new(bank)?)
                }
                RequestKind::Detect => {
                    let channel = match number {
                        Some(n) => u8::try_from(n)
                            .ok()
                            .and_then(MidiChannel::from_one_based)
                            .ok_or_else(|| anyhow!("channel {} out of range (1-16)", n))?,
                        None => config.channel().unwrap_or_default(),
                    };
                    log::info!(
                        "wait {} ms for the identity reply",
                        matrix.device_detect_sleep().as_millis()
                    );
                    vec![command::device_detect_on(channel)]
                }
            };
            write_messages(&output, &messages)?;
        }
        Commands::Store { program, output } => {
            let message = matrix.save_edit_buffer_to_program(ProgramNumber::new(program)?);
            write_messages(&output, &[message])?;
        }
        Commands::Convert {
            sysex_file,
            patch_index,
            program,
            name,
            output,
        } => {
            let messages = read_messages(&sysex_file)?;
            let patches = load_patches(&matrix, &messages, DumpKind::Program);

            let mut patch = patches.get(patch_index).cloned().ok_or_else(|| {
                anyhow!(
                    "patch index {} is out of range (file has {} patches)",
                    patch_index,
                    patches.len()
                )
            })?;

            if let Some(name) = name {
                patch.set_name(&name);
            }

            let messages = match program {
                Some(program) => {
                    let program = ProgramNumber::new(program)?;
                    patch.set_number(program);
                    let mut messages = vec![command::create_bank_select(program.bank())];
                    messages.extend(matrix.patch_to_program_dump_sysex(&patch)?);
                    messages
                }
                None => matrix.patch_to_sysex(&patch),
            };
            write_messages(&output, &messages)?;
        }
    }

    Ok(())
}

fn required(number: Option<u16>, what: &str) -> Result<u16> {
    match number {
        Some(n) => Ok(n),
        None => bail!("missing {}", what),
    }
}

fn read_messages(path: &Path) -> Result<Vec<SysexMessage>> {
    parse_sysex_file(path).with_context(|| format!("Error reading sysex file '{}'", path.display()))
}

fn write_messages(path: &Path, messages: &[SysexMessage]) -> Result<()> {
    std::fs::write(path, messages_to_bytes(messages))
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    log::info!("wrote {} message(s) to '{}'", messages.len(), path.display());
    Ok(())
}

/// Decode every patch dump in `messages`, skipping the ones that fail
fn load_patches(matrix: &Matrix1000, messages: &[SysexMessage], kind: DumpKind) -> Vec<Patch> {
    messages
        .iter()
        .filter(|m| match kind {
            DumpKind::EditBuffer => is_edit_buffer_dump(m),
            DumpKind::Program => is_single_program_dump(m),
        })
        .filter_map(|m| match matrix.patch_from_dump(m, kind) {
            Ok(patch) => Some(patch),
            Err(e) => {
                log::warn!("skipping patch: {}", e);
                None
            }
        })
        .collect()
}
