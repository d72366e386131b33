//! Selection of messages that receive command accessors

use prost_reflect::MessageDescriptor;
use protoc_gen_cmd_common::CommandTable;

/// How nested messages are reached during the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Only descend into messages that are themselves in the command table.
    ///
    /// A registered message nested inside an unregistered one is never seen.
    #[default]
    RegisteredAncestors,
    /// Descend into every message; unregistered ones are kept only as scopes
    /// for registered descendants
    AllMessages,
}

/// A message selected for emission, with its selected nested messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMessage {
    /// Simple name, e.g. `LoginReq`
    pub name: String,
    /// Protobuf full name, e.g. `game.proto.LoginReq`
    pub full_name: String,
    /// `None` when the message is only a scope for registered descendants
    pub cmd_id: Option<u16>,
    pub nested: Vec<CommandMessage>,
}

impl CommandMessage {
    /// Number of registered messages in this subtree, including itself
    pub fn registered_count(&self) -> usize {
        let own = usize::from(self.cmd_id.is_some());
        own + self.nested.iter().map(Self::registered_count).sum::<usize>()
    }
}

/// Walk messages depth-first and keep the ones present in `table`
///
/// Order follows declaration order, parents before their nested messages.
/// Map entry messages are skipped since no type is generated for them.
pub fn collect_command_messages<I>(
    messages: I,
    table: &CommandTable,
    traversal: Traversal,
) -> Vec<CommandMessage>
where
    I: IntoIterator<Item = MessageDescriptor>,
{
    let mut selected = Vec::new();

    for message in messages {
        if message.is_map_entry() {
            continue;
        }

        let cmd_id = table.get(message.full_name());

        if cmd_id.is_none() && traversal == Traversal::RegisteredAncestors {
            tracing::trace!(message = message.full_name(), "skipping unregistered message");
            continue;
        }

        let nested = collect_command_messages(message.child_messages(), table, traversal);

        if cmd_id.is_none() && nested.is_empty() {
            continue;
        }

        selected.push(CommandMessage {
            name: message.name().to_string(),
            full_name: message.full_name().to_string(),
            cmd_id,
            nested,
        });
    }

    selected
}
