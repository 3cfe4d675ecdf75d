//! Command definitions
//!
//! A command is the command name followed by its arguments, all sent as
//! binary-safe bulk strings.

/// A command to send to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    args: Vec<Vec<u8>>,
}

impl Command {
    /// Start a command with its name, e.g. `GRAPH.QUERY`
    pub fn new(name: impl AsRef<[u8]>) -> Self {
        Self {
            args: vec![name.as_ref().to_vec()],
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl AsRef<[u8]>) -> Self {
        self.args.push(arg.as_ref().to_vec());
        self
    }

    /// Append several arguments
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_vec()));
        self
    }

    /// Build from a full argument vector; `None` when it is empty
    pub fn from_args<I, A>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        let args: Vec<Vec<u8>> = args.into_iter().map(|a| a.as_ref().to_vec()).collect();
        if args.is_empty() {
            None
        } else {
            Some(Self { args })
        }
    }

    /// Upper-cased command name (for logging and dispatch)
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.args[0]).to_ascii_uppercase()
    }

    /// All parts, name first
    pub fn as_args(&self) -> &[Vec<u8>] {
        &self.args
    }
}
