use crate::device_display::impl_gui::image_submitted;
use crate::library::logger::interface::Logger;
use crate::session::core::Event;
use std::io::BufRead;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;

pub const HELP: &str = "commands: open <path> | classify | reset | start | stop | sample | cancel | theme | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Classify,
    Reset,
    Start,
    Stop,
    Sample,
    Cancel,
    Theme,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match (word.to_ascii_lowercase().as_str(), rest) {
        ("open", path) if !path.is_empty() => Some(Command::Open(path.to_string())),
        ("classify" | "analyze", "") => Some(Command::Classify),
        ("reset", "") => Some(Command::Reset),
        ("start", "") => Some(Command::Start),
        ("stop", "") => Some(Command::Stop),
        ("sample" | "draw", "") => Some(Command::Sample),
        ("cancel", "") => Some(Command::Cancel),
        ("theme", "") => Some(Command::Theme),
        ("quit" | "exit", "") => Some(Command::Quit),
        _ => None,
    }
}

pub fn command_event(command: Command) -> std::io::Result<Event> {
    Ok(match command {
        Command::Open(path) => image_submitted(Path::new(&path))?,
        Command::Classify => Event::ClassifyRequested,
        Command::Reset => Event::ImageReset,
        Command::Start => Event::CaptureStartRequested,
        Command::Stop => Event::CaptureStopRequested,
        Command::Sample => Event::SampleRequested,
        Command::Cancel => Event::RevealCancelled,
        Command::Theme => Event::ThemeToggled,
        Command::Quit => Event::Shutdown,
    })
}

/// Feeds stdin lines into the session until `quit` or end of input.
pub fn read_commands(input: impl BufRead, events: Sender<Event>, logger: Arc<dyn Logger + Send + Sync>) {
    let logger = logger.with_namespace("console");
    let _ = logger.info(HELP);

    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                let _ = logger.error(&format!("Reading input failed: {}", e));
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = parse_command(&line) else {
            let _ = logger.warn(&format!("Unknown command {:?}. {}", line.trim(), HELP));
            continue;
        };
        let quit = command == Command::Quit;

        match command_event(command) {
            Ok(event) => {
                if events.send(event).is_err() {
                    return;
                }
            }
            Err(e) => {
                let _ = logger.error(&format!("Could not open file: {}", e));
            }
        }

        if quit {
            return;
        }
    }

    let _ = events.send(Event::Shutdown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use std::sync::mpsc::channel;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("  sample "), Some(Command::Sample));
        assert_eq!(parse_command("START"), Some(Command::Start));
        assert_eq!(
            parse_command("open ./photos/my cat.png"),
            Some(Command::Open("./photos/my cat.png".to_string()))
        );
        assert_eq!(parse_command("open"), None);
        assert_eq!(parse_command("stop now"), None);
        assert_eq!(parse_command("dance"), None);
    }

    #[test]
    fn test_read_commands_sends_events_and_stops_at_quit() {
        let (sender, receiver) = channel();
        let input = "theme\nbogus\n\nsample\nquit\nstart\n".as_bytes();

        read_commands(input, sender, Arc::new(LoggerFake::new()));

        let events: Vec<Event> = receiver.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], Event::ThemeToggled));
        assert!(matches!(events[1], Event::SampleRequested));
        assert!(matches!(events[2], Event::Shutdown));
    }

    #[test]
    fn test_end_of_input_shuts_down() {
        let (sender, receiver) = channel();

        read_commands("stop\n".as_bytes(), sender, Arc::new(LoggerFake::new()));

        let events: Vec<Event> = receiver.try_iter().collect();
        assert!(matches!(events.last(), Some(Event::Shutdown)));
    }
}
