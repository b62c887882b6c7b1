#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .trim()
            .split(' ')
            .filter(|e| return !e.is_empty())
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        if args.is_empty() {
            return None;
        }

        // Group chats address commands as `/start@BotName`.
        let prefix = args[0]
            .split('@')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_start()
            || cmd.is_custom()
            || cmd.is_continue()
            || cmd.is_solver()
            || cmd.is_help()
            || cmd.is_quit()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_start(&self) -> bool {
        return ["/start", "/s"].contains(&self.command.as_str());
    }

    pub fn is_custom(&self) -> bool {
        return ["/custom", "/c"].contains(&self.command.as_str());
    }

    pub fn is_continue(&self) -> bool {
        return ["/continue"].contains(&self.command.as_str());
    }

    pub fn is_solver(&self) -> bool {
        return ["/solver"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/help", "/h"].contains(&self.command.as_str());
    }

    pub fn is_quit(&self) -> bool {
        return ["/quit", "/q"].contains(&self.command.as_str());
    }
}

/// Free text a guesser can send instead of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessCommand {
    Pass,
    Quit,
}

impl GuessCommand {
    pub fn parse(text: &str) -> Option<GuessCommand> {
        match text.trim().to_lowercase().as_str() {
            "-pass" => return Some(GuessCommand::Pass),
            "-quit" => return Some(GuessCommand::Quit),
            _ => return None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GuessCommand::Pass => return "-pass",
            GuessCommand::Quit => return "-quit",
        }
    }
}
