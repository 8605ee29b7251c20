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

        let prefix = args.remove(0);
        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_logout()
            || cmd.is_agent_list()
            || cmd.is_agent_call()
            || cmd.is_whoami()
            || cmd.is_clear()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_logout(&self) -> bool {
        return ["/lo", "/logout"].contains(&self.command.as_str());
    }

    pub fn is_agent_list(&self) -> bool {
        return ["/al", "/agents"].contains(&self.command.as_str());
    }

    pub fn is_agent_call(&self) -> bool {
        return ["/ag", "/agent"].contains(&self.command.as_str());
    }

    pub fn is_whoami(&self) -> bool {
        return ["/w", "/whoami"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return ["/cl", "/clear"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    /// Splits `/agent NAME QUERY...` into the agent name and query text.
    pub fn agent_call_args(&self) -> Option<(String, String)> {
        if !self.is_agent_call() || self.args.len() < 2 {
            return None;
        }

        return Some((self.args[0].to_string(), self.args[1..].join(" ")));
    }
}
