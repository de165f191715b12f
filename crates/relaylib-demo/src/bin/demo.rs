//! CLI entrypoint demonstrating the relaylib dynamic API.

use clap::{Parser, Subcommand};

use relaylib_demo::{ScannedField, parse_pack};

/// Demonstration driver for the relaylib shared surface.
#[derive(Debug, Parser)]
#[command(name = "relay-demo")]
#[command(about = "Drive the relaylib dynamic API from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print version, revision, and jump-table geometry.
    Info,
    /// Render a format string through the shared surface.
    Render {
        /// printf-style format string.
        format: String,
        /// Typed arguments as `kind:value` (int, uint, float, char, str).
        args: Vec<String>,
    },
    /// Scan an input line and print every stored conversion.
    Scan {
        /// Input text to scan.
        input: String,
        /// scanf-style format string.
        format: String,
    },
    /// Emit one log line through the shared surface.
    Log {
        /// Message text.
        message: String,
        /// Priority 0-3 (debug, info, warn, error).
        #[arg(long, default_value_t = 1)]
        priority: i32,
        /// Drop threshold to install before logging.
        #[arg(long)]
        threshold: Option<i32>,
    },
    /// Set, read back, and clear the per-thread error slot.
    Fail {
        /// printf-style format string.
        format: String,
        /// Typed arguments as `kind:value`.
        args: Vec<String>,
    },
    /// Negotiate a table copy the way an embedding loader would.
    Negotiate {
        /// Contract version to offer (defaults to this build's own).
        #[arg(long)]
        version: Option<u32>,
        /// Table bytes to declare (defaults to the full table).
        #[arg(long)]
        declared_size: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Info => {
            let info = relaylib_demo::surface_info();
            println!("revision:         {}", info.revision);
            println!("packed version:   {}", info.packed_version);
            println!("contract version: {}", info.contract_version);
            println!(
                "jump table:       {} slots, {} bytes",
                info.slots, info.table_bytes
            );
            println!(
                "override env:     {} (comma-separated module list)",
                relaylib_abi::RELAY_OVERRIDE_ENV
            );
            println!(
                "call tracing env: {} (any non-zero value)",
                relaylib_abi::RELAY_LOG_CALLS_ENV
            );
        }
        Command::Render { format, args } => {
            let packed = parse_pack(&args)?;
            println!("{}", relaylib_demo::render(&format, &packed)?);
        }
        Command::Scan { input, format } => {
            let (matched, fields) = relaylib_demo::scan(&input, &format)?;
            if matched < 0 {
                return Err("input ran out before the first conversion".into());
            }
            println!("matched {matched} conversion(s)");
            for (index, field) in fields.iter().enumerate() {
                match field {
                    ScannedField::Int(v) => println!("  [{index}] int    {v}"),
                    ScannedField::Uint(v) => println!("  [{index}] uint   {v}"),
                    ScannedField::Float(v) => println!("  [{index}] float  {v}"),
                    ScannedField::Text(v) => println!("  [{index}] text   {v:?}"),
                }
            }
        }
        Command::Log {
            message,
            priority,
            threshold,
        } => {
            if let Some(level) = threshold {
                relaylib_demo::set_log_threshold(level);
            }
            relaylib_demo::log_message(priority, &message)?;
            eprintln!(
                "logged at priority {priority} (threshold {})",
                relaylib_demo::log_threshold()
            );
        }
        Command::Fail { format, args } => {
            let packed = parse_pack(&args)?;
            relaylib_demo::set_error(&format, &packed)?;
            println!("error slot: {:?}", relaylib_demo::last_error());
            relaylib_demo::clear_error();
            println!("after clear: {:?}", relaylib_demo::last_error());
        }
        Command::Negotiate {
            version,
            declared_size,
        } => {
            let info = relaylib_demo::surface_info();
            let version = version.unwrap_or(info.contract_version);
            let declared = declared_size.unwrap_or(info.table_bytes);
            let probe = relaylib_demo::probe_entry(version, declared);
            println!(
                "entry(version={version}, size={declared}) -> {}",
                describe_code(probe.code)
            );
            println!("filled slots: {}/{}", probe.filled_slots, info.slots);
            if probe.code != relaylib_abi::entry::ENTRY_OK {
                return Err("negotiation rejected".into());
            }
        }
    }

    Ok(())
}

fn describe_code(code: i32) -> String {
    match code {
        relaylib_abi::entry::ENTRY_OK => String::from("0 (accepted)"),
        relaylib_abi::entry::ENTRY_INCOMPATIBLE_VERSION => {
            String::from("-1 (incompatible version)")
        }
        relaylib_abi::entry::ENTRY_TABLE_TOO_LARGE => String::from("-2 (table too large)"),
        other => format!("{other} (unknown)"),
    }
}
