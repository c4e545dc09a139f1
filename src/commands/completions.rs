use std::io::{self, Write};

use clap::{Args, CommandFactory};
use clap_complete::Shell;

use crate::cli::Cli;

#[derive(Debug, Clone, Args)]
pub struct CompletionsCommand {
    #[arg(value_enum, help = "Target shell for completion script")]
    pub shell: Shell,
}

impl CompletionsCommand {
    pub fn execute(self) {
        self.write_to(&mut io::stdout());
    }

    /// Renders the completion script for `shell` into `out`
    pub fn write_to(&self, out: &mut dyn Write) {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        clap_complete::generate(self.shell, &mut cmd, bin_name, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(shell: Shell) -> String {
        let mut buffer = Vec::new();
        CompletionsCommand { shell }.write_to(&mut buffer);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_bash_completion() {
        let script = generate(Shell::Bash);
        assert!(script.contains("_stsmfa()"));
        assert!(script.contains("complete -F _stsmfa"));
    }

    #[test]
    fn test_zsh_completion() {
        let script = generate(Shell::Zsh);
        assert!(script.contains("#compdef stsmfa"));
        assert!(script.contains("_arguments"));
    }

    #[test]
    fn test_fish_completion() {
        assert!(generate(Shell::Fish).contains("complete -c stsmfa"));
    }

    #[test]
    fn test_completion_contains_subcommands_and_auth_flags() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let script = generate(shell);
            for word in ["auth", "completions", "cache-dir", "session-name", "duration-seconds"] {
                assert!(
                    script.contains(word),
                    "'{word}' should be in {shell} completions"
                );
            }
        }
    }

    #[test]
    fn test_completion_contains_global_options() {
        let script = generate(Shell::Bash);
        assert!(script.contains("--region"));
        assert!(script.contains("--verbose"));
    }
}
