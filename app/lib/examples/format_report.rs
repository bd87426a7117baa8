//! Example: validate a file, describe its columns and render it in every output format.
//!
//! Run with: cargo run --example format_report -- path/to/data.csv

use std::env;
use std::time::Instant;

use tabconv::{pipeline, BufferRouter, ConverterConfig, Format, FormatValidator, ReadBack};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args().nth(1).ok_or("usage: format_report <file>")?;
    let config = ConverterConfig::default();

    println!("=== Format Report: {} ===\n", path);

    let start = Instant::now();
    let data = pipeline::load_file(&path, &FormatValidator::new(), &config)?;
    println!("Load time: {:?}", start.elapsed());
    println!("Rows: {}", data.row_count);
    println!("Columns: {:?}", data.column_names());

    println!("\n--- Column Analysis ---");
    for col in &data.columns {
        let null_count = col.values.iter().filter(|v| v.is_null()).count();
        println!(
            "  {}: {} values, {} nulls, type: {:?}",
            col.name,
            col.len(),
            null_count,
            col.inferred_type
        );
    }

    println!("\n--- Output Sizes ---");
    for format in Format::ALL {
        let mut router = BufferRouter::with_encoding(&config.buffer_encoding)?;
        pipeline::convert_to_buffer(Some(&data), format, &mut router, &config)?;
        let size = match router.read_back(format)? {
            ReadBack::Text(text) => text.len(),
            ReadBack::Table(table) => table.row_count,
        };
        let unit = if format == Format::Xlsx { "rows read back" } else { "bytes" };
        println!("  {:<5} {} {}", format.token(), size, unit);
    }

    Ok(())
}
