/// Messages a component emits from [`Component::update`](crate::Component::update).
///
/// Form widgets are fully synchronous: a command is either nothing, one
/// immediate message, or an ordered batch of commands.  The parent drains a
/// command with [`into_messages`](Command::into_messages) before handling
/// the next input event, so every emitted message is processed within the
/// same event.
///
/// # Examples
///
/// ```rust,ignore
/// // Do nothing:
/// let cmd = Command::none();
///
/// // Tell the parent the value changed:
/// let cmd = Command::message(Msg::Changed(value));
///
/// // Lift a child's command into the parent message space:
/// let cmd = child.update(m).map(ParentMsg::Child);
/// ```
pub struct Command<Msg> {
    inner: CommandInner<Msg>,
}

enum CommandInner<Msg> {
    None,
    Message(Msg),
    Batch(Vec<Command<Msg>>),
}

impl<Msg> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Emit a message immediately.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Message(msg),
        }
    }

    /// Emit several commands in order.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().map_or_else(Command::none, |c| c),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg>(self, f: impl Fn(Msg) -> NewMsg) -> Command<NewMsg> {
        self.map_with(&f)
    }

    fn map_with<NewMsg>(self, f: &dyn Fn(Msg) -> NewMsg) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Message(msg) => Command::message(f(msg)),
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(cmds.into_iter().map(|c| c.map_with(f)).collect()),
            },
        }
    }

    /// Whether this command does nothing.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// If this command is a single immediate message, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Message(msg) => Some(msg),
            _ => None,
        }
    }

    /// Flatten into the emitted messages, in order.
    pub fn into_messages(self) -> Vec<Msg> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(self, out: &mut Vec<Msg>) {
        match self.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => out.push(msg),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    cmd.collect_into(out);
                }
            }
        }
    }
}

impl<Msg> Default for Command<Msg> {
    fn default() -> Self {
        Command::none()
    }
}
