//! RCON CLI Client
//!
//! Runs a single command, or reads commands from stdin one per line.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use rcon_console::{Config, RconClient, RconError};
use tracing_subscriber::{fmt, EnvFilter};

/// RCON CLI
#[derive(Parser, Debug)]
#[command(name = "rcon-cli")]
#[command(about = "Run console commands on a Source/Minecraft server over RCON")]
#[command(version)]
struct Args {
    /// Server address (host[:port], port defaults to 25575)
    #[arg(short, long, default_value = "127.0.0.1:25575")]
    address: String,

    /// RCON password
    #[arg(short, long, env = "RCON_PASSWORD", hide_env_values = true)]
    password: String,

    /// Connect timeout in milliseconds (0 = OS default)
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Read/write timeout in milliseconds (0 = wait forever)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    /// Reject payloads larger than this many bytes
    #[arg(long)]
    max_payload: Option<usize>,

    /// Command to run; omit to read commands from stdin
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    // Logs go to stderr so command output on stdout stays clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,rcon_console=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = Config::builder()
        .address(&args.address)
        .password(&args.password)
        .connect_timeout_ms(args.connect_timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms);
    if let Some(max) = args.max_payload {
        builder = builder.max_payload_size(max);
    }
    let config = builder.build();

    let mut client = match RconClient::connect(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", args.address, e);
            return ExitCode::FAILURE;
        }
    };

    let result = if args.command.is_empty() {
        repl(&mut client)
    } else {
        run_one(&mut client, &args.command.join(" "))
    };

    client.close();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_one(client: &mut RconClient, command: &str) -> Result<(), RconError> {
    let output = client.command(command)?;
    println!("{}", display(&output));
    Ok(())
}

fn repl(client: &mut RconClient) -> Result<(), RconError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let command = line.trim();
        match command {
            "" => continue,
            "exit" | "quit" => return Ok(()),
            _ => {}
        }

        match client.command(command) {
            Ok(output) => writeln!(stdout, "{}", display(&output))?,
            // Bad input only affects this line while the connection survives it
            Err(e) if !client.is_closed() => tracing::error!("{}", e),
            Err(e) => return Err(e),
        }
    }
}

fn display(output: &str) -> &str {
    if output.is_empty() {
        "[empty]"
    } else {
        output
    }
}
