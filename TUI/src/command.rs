use crate::action::Action;
use crate::config::COMMANDS;
use crate::ui_state::Tab;

pub struct CommandParser;

impl CommandParser {
    /// Whether the input should be parsed as a slash command. Absolute
    /// paths like `/home/me/meme.png` are not commands.
    pub fn is_command(input: &str) -> bool {
        let input = input.trim();
        let word = input.split_whitespace().next().unwrap_or("");
        word.starts_with('/') && word.len() > 1 && !word[1..].contains(|c: char| c == '/' || c == '.')
    }

    /// Whether the first word names one of the known commands. A vibe
    /// query like `/shrug monday` is not one.
    pub fn is_known(input: &str) -> bool {
        let word = input.split_whitespace().next().unwrap_or("");
        COMMANDS.iter().any(|(cmd, _)| *cmd == word)
    }

    pub fn parse(input: &str) -> Result<Action, String> {
        let input = input.trim();
        if !Self::is_command(input) {
            return Err("Not a command".to_string());
        }

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        let args = args.trim();

        match cmd {
            "/analyze" => Ok(Action::SwitchTab(Tab::Analyze)),
            "/recommend" => Ok(Action::SwitchTab(Tab::Recommend)),
            "/reset" => Ok(Action::Reset),
            "/open" => match args.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Action::OpenMeme(n - 1)),
                _ => Err("Usage: /open <n>\n  Example: /open 2".to_string()),
            },
            "/copy" => Ok(Action::CopyDetectedText),
            "/health" => Ok(Action::CheckHealth),
            "/help" => Ok(Action::Help),
            "/quit" => Ok(Action::Quit),
            _ => Err(format!("Unknown command: {}. Type /help for available commands.", cmd)),
        }
    }
}
