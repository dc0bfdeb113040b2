//! CLI driver for the DRAM-backed short-read alignment accelerator
//! simulator.
//!
//! Usage:
//! ```text
//! accelerator-sim <subread_file> <interval_table_file> <position_table_file> \
//!                  <results_file> <input_reader_rams> <interval_table_rams> \
//!                  <position_table_rams> <num_stitchers>
//! ```
//!
//! Reads the three binary table/workload files, builds the pipeline, runs
//! it to completion, and writes one `<read_id>\t<position>` line per
//! emitted match to `results_file`. Prints a cycle-count summary on exit.

use std::fs;
use std::io::{BufWriter, Write};
use std::process::ExitCode;

use accelerator_sim::driver::{Driver, DriverConfig};
use accelerator_sim::params::{input_reader_defaults, interval_table_defaults, position_table_defaults};
use format_seedtable::{IntervalTable, PositionTable, SubreadFile};

struct Args {
    subread_path: String,
    interval_table_path: String,
    position_table_path: String,
    results_path: String,
    input_reader_rams: u32,
    interval_table_rams: u32,
    position_table_rams: u32,
    num_stitchers: u32,
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} <subread_file> <interval_table_file> <position_table_file> <results_file> \
         <input_reader_rams> <interval_table_rams> <position_table_rams> <num_stitchers>"
    )
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let [subread_path, interval_table_path, position_table_path, results_path, input_reader_rams, interval_table_rams, position_table_rams, num_stitchers] =
        raw
    else {
        return Err("expected exactly 8 arguments".to_string());
    };
    let parse_count = |name: &str, value: &str| -> Result<u32, String> {
        value
            .parse::<u32>()
            .map_err(|_| format!("{name} must be a positive integer, got {value:?}"))
            .and_then(|n| if n == 0 { Err(format!("{name} must be nonzero")) } else { Ok(n) })
    };
    Ok(Args {
        subread_path: subread_path.clone(),
        interval_table_path: interval_table_path.clone(),
        position_table_path: position_table_path.clone(),
        results_path: results_path.clone(),
        input_reader_rams: parse_count("input_reader_rams", input_reader_rams)?,
        interval_table_rams: parse_count("interval_table_rams", interval_table_rams)?,
        position_table_rams: parse_count("position_table_rams", position_table_rams)?,
        num_stitchers: parse_count("num_stitchers", num_stitchers)?,
    })
}

fn read_file(path: &str) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|e| format!("failed to read {path}: {e}"))
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv[1..]) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{}", usage(&argv[0]));
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    println!("Building the input reader");
    let subread_bytes = read_file(&args.subread_path)?;
    let subreads = SubreadFile::parse(&subread_bytes).map_err(|e| e.to_string())?;

    println!("Building interval table");
    let interval_bytes = read_file(&args.interval_table_path)?;
    let interval_table = IntervalTable::parse(&interval_bytes).map_err(|e| e.to_string())?;

    println!("Building the position table");
    let position_bytes = read_file(&args.position_table_path)?;
    let position_table = PositionTable::parse(&position_bytes).map_err(|e| e.to_string())?;

    let num_itcs = subreads.num_subreads_per_query * args.num_stitchers;
    if num_itcs == 0 {
        return Err("subreads_per_read * num_stitchers must be nonzero".to_string());
    }

    let config = DriverConfig {
        subreads_per_read: subreads.num_subreads_per_query,
        subread_length: subreads.subread_length,
        num_reads: subreads.num_queries,
        num_stitchers: args.num_stitchers,
        input_reader: input_reader_defaults(args.input_reader_rams, num_itcs),
        interval_table: interval_table_defaults(args.interval_table_rams, num_itcs),
        position_table: position_table_defaults(args.position_table_rams, num_itcs),
    };

    println!("Instantiating ITCs");
    println!("Instantiating PTCs");
    println!("Instantiating Stitchers");
    let mut driver = Driver::new(config, &subreads.data, &interval_table.entries, &position_table.positions);

    println!("Running benchmark and writing results");
    let results_file = fs::File::create(&args.results_path)
        .map_err(|e| format!("failed to create {}: {e}", args.results_path))?;
    let mut writer = BufWriter::new(results_file);

    let mut num_results = 0u64;
    let cycles = driver.run(|rp, cycle_count| {
        num_results += 1;
        writeln!(writer, "{}\t{}", rp.read_id, rp.position).expect("write to results file");
        println!("{num_results} results \t{}", cycle_count.get());
    });
    writer.flush().map_err(|e| format!("failed to flush {}: {e}", args.results_path))?;

    println!("Job took {} cycles", cycles.get());
    Ok(())
}
