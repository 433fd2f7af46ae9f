// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate escape_kernel;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use escape_kernel::{ComplexRect, Family, FractalKernel, IterationGrid, Layout, PixelRect};
use failure::Error;
use num::Complex;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;

fn parse_list<T: FromStr>(s: &str, separator: char, count: usize) -> Option<Vec<T>> {
    let values: Vec<T> = s
        .split(separator)
        .map(|v| T::from_str(v.trim()).ok())
        .collect::<Option<Vec<T>>>()?;
    if values.len() == count {
        Some(values)
    } else {
        None
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_list::<f64>(s, ',', 2).map(|v| Complex::new(v[0], v[1]))
}

fn parse_pixels(s: &str) -> Option<PixelRect> {
    parse_list::<i32>(s, ',', 4).map(|v| PixelRect::new(v[0], v[1], v[2], v[3]))
}

fn validate_list<T: FromStr>(s: &str, count: usize, err: &str) -> Result<(), String> {
    match parse_list::<T>(s, ',', count) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const PIXELS: &str = "pixels";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const JULIA: &str = "julia";
const COLUMN_MAJOR: &str = "column-major";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("escape")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Prints escape-time iteration counts for a pixel rectangle")
        .arg(
            Arg::with_name(PIXELS)
                .long(PIXELS)
                .short("p")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0,0,79,39")
                .validator(|s| {
                    validate_list::<i32>(&s, 4, "Could not parse pixel rectangle x1,y1,x2,y2")
                })
                .help("Inclusive pixel rectangle to compute"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.103,-1.238")
                .validator(|s| validate_list::<f64>(&s, 2, "Could not parse left lower corner"))
                .help("Left lower corner of the complex plane"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.201,1.240")
                .validator(|s| validate_list::<f64>(&s, 2, "Could not parse right upper corner"))
                .help("Right upper corner of the complex plane"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum number of iterations per pixel"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(JULIA)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_list::<f64>(&s, 2, "Could not parse Julia constant"))
                .help("Render the Julia set for this constant instead of the Mandelbrot set"),
        )
        .arg(
            Arg::with_name(COLUMN_MAJOR)
                .long(COLUMN_MAJOR)
                .help("Print one line per column instead of one per row"),
        )
        .get_matches()
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let value = |name: &str| {
        matches
            .value_of(name)
            .ok_or_else(|| format_err!("missing value for --{}", name))
    };

    let pixels = parse_pixels(value(PIXELS)?)
        .ok_or_else(|| format_err!("Error parsing pixel rectangle"))?;
    let leftlower = parse_complex(value(LEFTLOWER)?)
        .ok_or_else(|| format_err!("Error parsing left lower point"))?;
    let rightupper = parse_complex(value(RIGHTUPPER)?)
        .ok_or_else(|| format_err!("Error parsing right upper point"))?;
    let iterations = u32::from_str(value(ITERATIONS)?)?;
    let threads = usize::from_str(value(THREADS)?)?;
    let family = match matches.value_of(JULIA) {
        Some(c) => Family::Julia(
            parse_complex(c).ok_or_else(|| format_err!("Error parsing Julia constant"))?,
        ),
        None => Family::Mandelbrot,
    };
    let layout = if matches.is_present(COLUMN_MAJOR) {
        Layout::ColumnMajor
    } else {
        Layout::RowMajor
    };

    let kernel = FractalKernel::new(
        pixels,
        ComplexRect::from_corners(leftlower, rightupper),
        iterations,
    )?
    .with_family(family);

    let len = pixels
        .len()
        .ok_or_else(|| format_err!("Pixel rectangle is too large"))?;
    let mut cells = vec![0 as u32; len];
    kernel.render_threaded(&mut IterationGrid::new(&mut cells).with_layout(layout), threads)?;
    info!("computed {} pixels", len);

    let line_len = match layout {
        Layout::RowMajor => pixels.width(),
        Layout::ColumnMajor => pixels.height(),
    };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in cells.chunks(line_len) {
        let counts: Vec<String> = line.iter().map(|n| n.to_string()).collect();
        writeln!(out, "{}", counts.join(" "))?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
