use semigroup_homology::homology::strategy::SemigroupHomologyOptions;
use semigroup_homology::{integral_semigroup_homology, table};
use std::env;
use std::time::Instant;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} [-d maxdim] [-v] <table>", program);
    eprintln!();
    eprintln!("  table: multiplication table rows as base-36 digits, separated by ';'");
    eprintln!("  -d maxdim: highest homology dimension to compute (default: 6)");
    eprintln!("  -v: display more of the computation process");
    eprintln!();
    eprintln!("Example (the order-2 group):");
    eprintln!("  {} -d 10 \"01;10\"", program);
    std::process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut maxdim: usize = 6;
    let mut verbose = false;
    let mut table_text: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-d" | "--maxdim" => {
                i += 1;
                if i >= args.len() {
                    usage(&program);
                }
                maxdim = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Invalid maxdim: {}", args[i]);
                    std::process::exit(1);
                });
            }
            "-v" | "--verbose" => verbose = true,
            text => {
                if table_text.is_some() {
                    usage(&program);
                }
                table_text = Some(text.to_string());
            }
        }
        i += 1;
    }
    let table_text = match table_text {
        Some(text) => text,
        None => usage(&program),
    };

    let op = match table::parse_table(&table_text) {
        Ok(op) => op,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let options = SemigroupHomologyOptions {
        verbose,
        ..SemigroupHomologyOptions::default()
    };
    match integral_semigroup_homology(&op, maxdim, options) {
        Ok(homology) => {
            for (dim, group) in homology.iter().enumerate() {
                println!("H_{}: {}", dim, group);
            }
            println!("Elapsed (wall) time: {:?}", start.elapsed());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
