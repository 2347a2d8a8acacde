use std::error::Error;
use std::io;
use std::path::Path;

use clap::{App, Arg, SubCommand};
use fern;
use loop_pairs::{write_candidate_pairs, write_labeled_pairs};

fn setup_logging(verbosity: u64, log_file: &Path) -> Result<(), fern::InitError> {
    let mut base_config = fern::Dispatch::new();

    base_config = match verbosity {
        0 => base_config.level(log::LevelFilter::Info),
        1 => base_config.level(log::LevelFilter::Debug),
        _ => base_config.level(log::LevelFilter::Trace),
    };

    let file_config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(fern::log_file(log_file)?);

    let stdout_config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%H:%M"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(io::stdout());

    base_config
        .chain(file_config)
        .chain(stdout_config)
        .apply()?;

    Ok(())
}

fn log_level_arg() -> Arg<'static, 'static> {
    Arg::<'static, 'static>::with_name("log_level")
        .short("l")
        .long("log_level")
        .value_name("NUM")
        .takes_value(true)
        .required(false)
        .help("Verbosity of logging (0 - 3)")
}

fn bins_arg() -> Arg<'static, 'static> {
    Arg::<'static, 'static>::with_name("bins")
        .short("b")
        .long("bins")
        .value_name("FILE")
        .takes_value(true)
        .required(true)
        .help("Bin feature table with chrom, start, end, atac, h3k27ac columns. \
               Tab separated for .tsv/.bed, comma separated for .csv.")
}

fn out_arg(hm: &'static str) -> Arg<'static, 'static> {
    Arg::<'static, 'static>::with_name("out")
        .short("o")
        .long("out")
        .value_name("FILE")
        .takes_value(true)
        .required(true)
        .help(hm)
}

fn window_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name("min_dist")
            .long("min-dist")
            .value_name("INT")
            .takes_value(true)
            .required(true)
            .help("Minimum midpoint distance in bp (inclusive)."),
        Arg::with_name("max_dist")
            .long("max-dist")
            .value_name("INT")
            .takes_value(true)
            .required(true)
            .help("Maximum midpoint distance in bp (inclusive)."),
    ]
}

fn main() -> Result<(), Box<dyn Error>> {
    let matches = App::new("loop-pairs")
        .version("0.1.0")
        .author("Pavel Avdeyev")
        .about("loop-pairs enumerates candidate bin pairs for chromatin loop \
                prediction and labels them against known loop anchors.")
        .subcommand(
            SubCommand::with_name("candidates")
                .about("Generate candidate bin pairs within a distance window.")
                .arg(bins_arg())
                .arg(out_arg("Path to output candidate table."))
                .args(&window_args())
                .arg(log_level_arg()),
        )
        .subcommand(
            SubCommand::with_name("label")
                .about("Generate candidate pairs and label them against a loop table.")
                .arg(bins_arg())
                .arg(
                    Arg::with_name("loops")
                        .short("p")
                        .long("loops")
                        .value_name("FILE")
                        .takes_value(true)
                        .required(true)
                        .help("Loop table in bedpe-like format. Anchor columns are \
                               matched by name when present, else the first six columns."),
                )
                .arg(out_arg("Path to output labeled table."))
                .args(&window_args())
                .arg(
                    Arg::with_name("resolution")
                        .short("r")
                        .long("resolution")
                        .value_name("INT")
                        .takes_value(true)
                        .required(true)
                        .help("Bin width in bp used to discretize loop anchors."),
                )
                .arg(log_level_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        ("candidates", Some(cnd_matches)) => {
            let verbosity: u64 = cnd_matches.value_of("log_level").unwrap_or("0").parse().unwrap();
            setup_logging(verbosity, "candidates.log".as_ref()).expect("failed to initialize logging.");
            let bins_file = cnd_matches.value_of("bins").expect("Input bins file must be provided.");
            let out_file = cnd_matches.value_of("out").expect("Output file must be provided.");
            let min_dist: u64 = cnd_matches.value_of("min_dist").unwrap().parse().unwrap();
            let max_dist: u64 = cnd_matches.value_of("max_dist").unwrap().parse().unwrap();
            write_candidate_pairs(Path::new(bins_file), Path::new(out_file), min_dist, max_dist)?;
        }
        ("label", Some(lbl_matches)) => {
            let verbosity: u64 = lbl_matches.value_of("log_level").unwrap_or("0").parse().unwrap();
            setup_logging(verbosity, "label.log".as_ref()).expect("failed to initialize logging.");
            let bins_file = lbl_matches.value_of("bins").expect("Input bins file must be provided.");
            let loops_file = lbl_matches.value_of("loops").expect("Input loops file must be provided.");
            let out_file = lbl_matches.value_of("out").expect("Output file must be provided.");
            let min_dist: u64 = lbl_matches.value_of("min_dist").unwrap().parse().unwrap();
            let max_dist: u64 = lbl_matches.value_of("max_dist").unwrap().parse().unwrap();
            let resolution: u32 = lbl_matches.value_of("resolution").unwrap().parse().unwrap();
            write_labeled_pairs(
                Path::new(bins_file),
                Path::new(loops_file),
                Path::new(out_file),
                min_dist,
                max_dist,
                resolution,
            )?;
        }
        ("", None) => eprintln!("No subcommands were provided. See help for available one."),
        _ => unreachable!(),
    };
    Ok(())
}
