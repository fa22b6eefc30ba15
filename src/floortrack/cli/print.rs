use colored::Colorize;
use floortrack::commands::{CmdMessage, CmdResult, MessageLevel};
use floortrack::error::TrackError;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_result(result: &CmdResult) {
    for line in &result.display_lines {
        println!("{}", line);
    }
    print_messages(&result.messages);
}

pub fn print_scan_error(e: &TrackError) {
    println!("{}", format!("An error occurred: {}", e).red());
}

pub fn print_totals(totals: &[(String, Option<f64>)]) {
    for (category, total) in totals {
        match total {
            Some(total) => println!("{}: {} m^2", category.bold(), total),
            None => println!("{}: {}", category.bold(), "no records".dimmed()),
        }
    }
}
