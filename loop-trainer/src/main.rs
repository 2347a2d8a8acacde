use std::error::Error;
use std::io;
use std::path::Path;

use clap::{App, Arg, SubCommand};
use fern;
use loop_trainer::run_training;

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

fn main() -> Result<(), Box<dyn Error>> {
    let matches = App::new("loop-trainer")
        .version("0.1.0")
        .author("Pavel Avdeyev")
        .about("loop-trainer fits and evaluates a binary chromatin loop \
                predictor over labeled candidate bin pairs.")
        .subcommand(
            SubCommand::with_name("train")
                .about("Run the full pipeline: label candidates, build features, \
                        fit the model, save artifacts.")
                .arg(
                    Arg::with_name("config")
                        .short("c")
                        .long("config")
                        .value_name("FILE")
                        .takes_value(true)
                        .required(true)
                        .help("Path to training config in yaml format. May extend a \
                               sibling file via the extends key."),
                )
                .arg(
                    Arg::with_name("log_level")
                        .short("l")
                        .long("log_level")
                        .value_name("NUM")
                        .takes_value(true)
                        .required(false)
                        .help("Verbosity of logging (0 - 3)"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("train", Some(train_matches)) => {
            let verbosity: u64 = train_matches.value_of("log_level").unwrap_or("0").parse().unwrap();
            setup_logging(verbosity, "train.log".as_ref()).expect("failed to initialize logging.");
            let config_file = train_matches.value_of("config").expect("Config file must be provided.");
            let summary = run_training(Path::new(config_file))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        ("", None) => eprintln!("No subcommands were provided. See help for available one."),
        _ => unreachable!(),
    };
    Ok(())
}
