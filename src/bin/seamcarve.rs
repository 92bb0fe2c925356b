extern crate clap;
extern crate image;

use astarseam::{energy_map, energy_to_image, SeamCarver};
use clap::{App, Arg, ArgMatches};
use log::info;
use std::process;

fn dimension(matches: &ArgMatches, name: &str, current: u32) -> Result<u32, failure::Error> {
    match matches.value_of(name) {
        Some(v) => v
            .parse::<u32>()
            .map_err(|e| failure::format_err!("--{} {}: {}", name, v, e)),
        None => Ok(current),
    }
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let input = matches.value_of("input").unwrap_or_default();
    let output = matches.value_of("output").unwrap_or_default();

    let image = image::open(input)?.to_rgb8();
    let (width, height) = image.dimensions();
    info!("loaded {} ({}x{})", input, width, height);

    if matches.is_present("energy") {
        energy_to_image(&energy_map(&image)?).save(output)?;
        return Ok(());
    }

    let (new_width, new_height) = (
        dimension(matches, "width", width)?,
        dimension(matches, "height", height)?,
    );
    let mut carver = SeamCarver::from_buffer(image);
    carver.carve(new_width, new_height)?;
    info!("carved to {}x{}, writing {}", new_width, new_height, output);
    carver.into_picture().save(output)?;
    Ok(())
}

fn main() {
    env_logger::init();

    let matches = App::new("seamcarve")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image shrinking by seam carving")
        .arg(
            Arg::with_name("input")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Where to write the result; the format follows the extension")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("width")
                .short("w")
                .long("width")
                .takes_value(true)
                .help("Target width (default: unchanged)"),
        )
        .arg(
            Arg::with_name("height")
                .short("H")
                .long("height")
                .takes_value(true)
                .help("Target height (default: unchanged)"),
        )
        .arg(
            Arg::with_name("energy")
                .long("energy")
                .help("Write the energy map instead of carving"),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("seamcarve: {}", e);
        process::exit(1);
    }
}
