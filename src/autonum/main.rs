use autonum::commands::{self, CmdMessage, CmdResult, MessageLevel};
use autonum::error::Result;
use autonum::host::fs::DrawingFile;
use clap::Parser;
use colored::*;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { container, tag } => {
            let drawing = DrawingFile::load(&cli.drawing)?;
            let result = commands::scan::run(&drawing, &container, &tag)?;
            print_result(&result);
        }
        Commands::Apply {
            container,
            tag,
            seed,
        } => {
            let mut drawing = DrawingFile::load(&cli.drawing)?;
            let result = commands::apply::run(&mut drawing, &container, &tag, seed)?;
            drawing.save(&cli.drawing)?;
            print_result(&result);
        }
    }
    Ok(())
}

fn print_result(result: &CmdResult) {
    for assigned in &result.assigned {
        println!(
            "{} {} {}",
            assigned.container.dimmed(),
            assigned.tag.yellow(),
            assigned.value.bold()
        );
    }
    if let Some(next) = result.next_value {
        println!("next value: {}", next.to_string().bold());
    }
    print_messages(&result.messages);
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}
