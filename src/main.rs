use clap::Parser;
use std::process;
use taskmover::cli::{ExtractArgs, GenerateConfigArgs, RolloverArgs};
use taskmover::{
    Cli, Command, OutputFormat, OutputFormatter, OutputMode, Result, TaskMover, TaskMoverError,
    UserFriendlyError,
};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Needs no configuration, so a broken config file cannot block it
    if let Command::GenerateConfig(ref args) = cli.command {
        return handle_generate_config(args);
    }

    let taskmover = match TaskMover::from_cli(&cli) {
        Ok(taskmover) => taskmover,
        Err(e) => {
            print_startup_error(&cli, &e);
            return exit_code(&e);
        }
    };

    let result = match cli.command {
        Command::Extract(ref args) => handle_extract(&taskmover, args),
        Command::Rollover(ref args) => handle_rollover(&taskmover, args),
        Command::GenerateConfig(_) => Ok(()),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            taskmover.handle_error(&e);
            exit_code(&e)
        }
    }
}

fn exit_code(error: &TaskMoverError) -> i32 {
    match error {
        TaskMoverError::InvalidStatusPattern { .. } => 2,
        TaskMoverError::NoSourceNotes { .. } => 3,
        TaskMoverError::TargetNotFound { .. } => 4,
        TaskMoverError::Config { .. } => 5,
        _ => 1, // General error
    }
}

fn handle_extract(taskmover: &TaskMover, args: &ExtractArgs) -> Result<()> {
    let options = args.extract_options(taskmover.config());
    let tasks = taskmover.extract_file(&args.file, &options)?;
    taskmover.output_formatter().print_tasks(&tasks);
    Ok(())
}

fn handle_rollover(taskmover: &TaskMover, args: &RolloverArgs) -> Result<()> {
    let report = taskmover.rollover(&args.request())?;
    taskmover.output_formatter().print_rollover_report(&report);
    Ok(())
}

fn handle_generate_config(args: &GenerateConfigArgs) -> i32 {
    match TaskMover::generate_sample_config(&args.path) {
        Ok(()) => {
            println!(
                "Generated sample configuration file: {}",
                args.path.display()
            );
            println!("\nTo use this configuration:");
            println!("  taskmover --config {} rollover", args.path.display());
            println!("\nEdit the file to point [notes] at your vault.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(cli: &Cli, error: &TaskMoverError) {
    let mode = match cli.output_format {
        OutputFormat::Json => OutputMode::Json,
        OutputFormat::Plain => OutputMode::Plain,
        OutputFormat::Human => OutputMode::Human,
    };
    let formatter = OutputFormatter::new(mode, 0, false);
    formatter.print_user_friendly_error(error);
}
