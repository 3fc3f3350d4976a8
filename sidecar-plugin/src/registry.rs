//! The static command table
//!
//! Built once at process start and never mutated. Both the `metadata`
//! response and the matcher's prefix list are derived from it, so the two
//! cannot drift apart.

use once_cell::sync::Lazy;
use sidecar_protocol::{CommandInfo, PluginMetadata};

pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub aliases: &'static [&'static str],
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "ping",
        description: "Simple ping/pong test",
        aliases: &[],
    },
    CommandSpec {
        name: "echo",
        description: "Echo back the given text",
        aliases: &[],
    },
    CommandSpec {
        name: "time",
        description: "Show current server time",
        aliases: &["now"],
    },
    CommandSpec {
        name: "help",
        description: "Show help message",
        aliases: &["?"],
    },
];

static PREFIXES: Lazy<Vec<String>> = Lazy::new(|| {
    COMMANDS
        .iter()
        .flat_map(|cmd| std::iter::once(cmd.name).chain(cmd.aliases.iter().copied()))
        .map(|name| format!("/{name}"))
        .collect()
});

/// Slash-prefixed forms of every command name and alias, in table order.
pub fn command_prefixes() -> &'static [String] {
    &PREFIXES
}

/// Assemble the `metadata` response from the table.
pub fn metadata() -> PluginMetadata {
    let mut meta = PluginMetadata::new("sidecar-demo")
        .description("Sidecar demo plugin - Echo, Ping, Time commands")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Sidecar Team");

    for cmd in COMMANDS {
        meta = meta.command(CommandInfo {
            name: cmd.name.to_string(),
            description: cmd.description.to_string(),
            aliases: cmd.aliases.iter().map(|a| a.to_string()).collect(),
        });
    }

    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_cover_names_and_aliases() {
        assert_eq!(
            command_prefixes(),
            &["/ping", "/echo", "/time", "/now", "/help", "/?"]
        );
    }

    #[test]
    fn test_metadata_lists_every_command() {
        let meta = metadata();
        assert_eq!(meta.name, "sidecar-demo");
        let names: Vec<_> = meta.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["ping", "echo", "time", "help"]);
        assert_eq!(meta.commands[2].aliases, ["now"]);
    }
}
