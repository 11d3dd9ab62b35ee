//! Terminal front end
//!
//! Typed lines stand in for recognized speech. Lines starting with `:` are
//! the on-screen buttons.

use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use vassist_core::NarrationMode;
use vassist_pipeline::{PipelineHandle, Tab};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Detect,
    Describe,
    Live,
    Mute,
    Listen,
    Camera,
    Chat,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Shortcut(Shortcut),
    /// Text handed to the recognizer as a transcript
    Speech(String),
    Unknown(String),
    Blank,
}

pub fn parse_line(line: &str) -> ConsoleInput {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleInput::Blank;
    }
    let Some(command) = line.strip_prefix(':') else {
        return ConsoleInput::Speech(line.to_string());
    };

    let shortcut = match command.trim().to_lowercase().as_str() {
        "detect" | "d" => Shortcut::Detect,
        "describe" => Shortcut::Describe,
        "live" | "l" => Shortcut::Live,
        "mute" | "m" => Shortcut::Mute,
        "listen" => Shortcut::Listen,
        "camera" => Shortcut::Camera,
        "chat" => Shortcut::Chat,
        "help" | "?" => Shortcut::Help,
        "quit" | "exit" | "q" => Shortcut::Quit,
        other => return ConsoleInput::Unknown(other.to_string()),
    };
    ConsoleInput::Shortcut(shortcut)
}

pub fn print_help() {
    println!("📚 Say something (type a line) or use a button:");
    println!("  :detect, :d       - Quick detection");
    println!("  :describe         - Detailed detection");
    println!("  :live, :l         - Toggle live detection");
    println!("  :mute, :m         - Toggle narration");
    println!("  :listen           - Restart voice input");
    println!("  :camera, :chat    - Switch view");
    println!("  :quit, :q         - Exit");
    println!();
}

/// Read stdin on a dedicated thread. The channel closes at EOF.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(64);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Route input lines until EOF or `:quit`, feeding transcripts and button
/// presses. Ends the pipeline when input ends.
pub async fn run_console(
    mut lines: mpsc::Receiver<String>,
    handle: PipelineHandle,
    transcripts: mpsc::Sender<String>,
) {
    while let Some(line) = lines.recv().await {
        let result = match parse_line(&line) {
            ConsoleInput::Blank => Ok(()),
            ConsoleInput::Speech(text) => {
                if transcripts.send(text).await.is_err() {
                    debug!("Voice input no longer listening");
                }
                Ok(())
            }
            ConsoleInput::Unknown(command) => {
                println!("❌ Unknown command ':{}' (try :help)", command);
                Ok(())
            }
            ConsoleInput::Shortcut(Shortcut::Help) => {
                print_help();
                Ok(())
            }
            ConsoleInput::Shortcut(Shortcut::Quit) => break,
            ConsoleInput::Shortcut(Shortcut::Detect) => handle.detect(NarrationMode::Quick).await,
            ConsoleInput::Shortcut(Shortcut::Describe) => {
                handle.detect(NarrationMode::Detailed).await
            }
            ConsoleInput::Shortcut(Shortcut::Live) => handle.toggle_live().await,
            ConsoleInput::Shortcut(Shortcut::Mute) => handle.toggle_mute().await,
            ConsoleInput::Shortcut(Shortcut::Listen) => handle.start_listening().await,
            ConsoleInput::Shortcut(Shortcut::Camera) => handle.select_tab(Tab::Camera).await,
            ConsoleInput::Shortcut(Shortcut::Chat) => handle.select_tab(Tab::Chat).await,
        };

        if result.is_err() {
            return;
        }
    }

    let _ = handle.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shortcuts() {
        assert_eq!(parse_line(":mute"), ConsoleInput::Shortcut(Shortcut::Mute));
        assert_eq!(parse_line("  :Chat "), ConsoleInput::Shortcut(Shortcut::Chat));
        assert_eq!(parse_line(":q"), ConsoleInput::Shortcut(Shortcut::Quit));
        assert_eq!(parse_line(":fly"), ConsoleInput::Unknown("fly".to_string()));
    }

    #[test]
    fn test_plain_lines_are_speech() {
        assert_eq!(
            parse_line("describe the room"),
            ConsoleInput::Speech("describe the room".to_string())
        );
        assert_eq!(parse_line("   "), ConsoleInput::Blank);
    }
}
