//! Interactive shell for virtual arrays.
//!
//! Usage:
//!   vm_cli
//!
//! Commands (read line by line from stdin):
//!   create <file>, <type>[, <count>]   type is int | char(N) | varchar(N)
//!   input <index>, <value>
//!   print <index>
//!   info
//!   help
//!   exit

use serde_json::json;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use virtual_array::{Config, ElementType, PageEvent, Value, VirtualArray};

/// Element count used when `create` is given none
const DEFAULT_ELEMENT_COUNT: u64 = 10_000;

#[derive(Default)]
struct Session {
    array: Option<VirtualArray>,
}

enum Flow {
    Continue,
    Exit,
}

fn split_args(args: &str, n: usize) -> Vec<&str> {
    args.splitn(n, ',').map(str::trim).collect()
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_index(arg: &str) -> Result<i64, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("invalid index `{}`", arg.trim()))
}

impl Session {
    fn array(&self) -> Result<&VirtualArray, String> {
        self.array
            .as_ref()
            .ok_or_else(|| "no array created, use `create` first".to_string())
    }

    fn execute(&mut self, line: &str) -> Result<Flow, String> {
        let (command, args) = match line.trim().split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (line.trim(), ""),
        };

        match command.to_lowercase().as_str() {
            "" => {}
            "help" => print_help(),
            "create" => self.create(args)?,
            "input" => self.input(args)?,
            "print" => self.print(args)?,
            "info" => self.info()?,
            "exit" | "quit" => return Ok(Flow::Exit),
            other => return Err(format!("unknown command `{}`, type `help`", other)),
        }
        Ok(Flow::Continue)
    }

    fn create(&mut self, args: &str) -> Result<(), String> {
        let parts = split_args(args, 3);
        if parts.len() < 2 || parts[0].is_empty() {
            return Err("usage: create <file>, <type>[, <count>]".to_string());
        }

        let element_type: ElementType = parts[1].parse().map_err(|e| format!("{}", e))?;
        let element_count = match parts.get(2) {
            Some(count) => count
                .parse()
                .map_err(|_| format!("invalid element count `{}`", count))?,
            None => DEFAULT_ELEMENT_COUNT,
        };

        self.shutdown();

        let config = Config::new(parts[0], element_count, element_type)
            .observer(Arc::new(|event: &PageEvent| println!("{}", event)));
        let array = VirtualArray::open(config).map_err(|e| e.to_string())?;

        println!(
            "Created {} array of {} elements in {}",
            element_type, element_count, parts[0]
        );
        self.array = Some(array);
        Ok(())
    }

    fn input(&mut self, args: &str) -> Result<(), String> {
        let array = self.array()?;
        let parts = split_args(args, 2);
        if parts.len() < 2 {
            return Err("usage: input <index>, <value>".to_string());
        }

        let index = parse_index(parts[0])?;
        let value = match array.element_type() {
            ElementType::Int32 => Value::Int(
                parts[1]
                    .parse()
                    .map_err(|_| format!("invalid integer `{}`", parts[1]))?,
            ),
            ElementType::FixedText(_) | ElementType::VarText(_) => {
                Value::from(strip_quotes(parts[1]))
            }
        };

        array.write(index, value.clone()).map_err(|e| e.to_string())?;
        println!("OK: [{}] = {}", index, value);
        Ok(())
    }

    fn print(&self, args: &str) -> Result<(), String> {
        let array = self.array()?;
        let index = parse_index(args)?;

        match array.read(index).map_err(|e| e.to_string())? {
            Some(value) => println!("[{}] = {}", index, value),
            None => println!("[{}] is not set", index),
        }
        Ok(())
    }

    fn info(&self) -> Result<(), String> {
        let array = self.array()?;
        let stats = array.stats().map_err(|e| e.to_string())?;
        let data_log_bytes = array.data_log_len().map_err(|e| e.to_string())?;

        let info = json!({
            "metadata": array.metadata(),
            "bufferPool": stats,
            "dataLogBytes": data_log_bytes,
        });
        let text = serde_json::to_string_pretty(&info).map_err(|e| e.to_string())?;
        println!("{}", text);
        Ok(())
    }

    /// Close the current array, reporting but not propagating failures
    fn shutdown(&mut self) {
        if let Some(array) = self.array.take() {
            if let Err(e) = array.close() {
                eprintln!("Warning: failed to flush {}: {}", array.path().display(), e);
            }
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  create <file>, <type>[, <count>]  - Create or open an array");
    println!("        types: int | char(N) | varchar(N), default count {}", DEFAULT_ELEMENT_COUNT);
    println!("        e.g. create data.bin, varchar(20)");
    println!("  input <index>, <value>            - Write an element");
    println!("        e.g. input 15, \"Hello\"");
    println!("  print <index>                     - Read an element");
    println!("  info                              - Show array metadata and buffer pool stats");
    println!("  help                              - Show this message");
    println!("  exit                              - Flush and quit");
}

fn main() {
    // Respect RUST_LOG for storage-level tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    println!("Virtual array shell. Type `help` for commands.");

    let mut session = Session::default();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("VM> ");
        if let Err(e) = io::stdout().flush() {
            eprintln!("ERROR: {}", e);
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("ERROR: failed to read input: {}", e);
                break;
            }
            None => break,
        };

        match session.execute(&line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => eprintln!("ERROR: {}", e),
        }
    }

    session.shutdown();
}
