use thiserror::Error;

/// Everything that can go wrong between registering a command and running it.
///
/// Parse-time variants carry the usage text of the scope that was being
/// parsed, so the caller can print it next to the message.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("malformed options: {0}")]
    MalformedOptionsShape(String),

    #[error("duplicate command `{0}`")]
    DuplicateCommand(String),

    #[error("unknown command `{name}`")]
    UnknownCommand { name: String, usage: String },

    #[error("missing subcommand")]
    MissingSubcommand { usage: String },

    #[error("unrecognized flag `{flag}`")]
    UnrecognizedFlag { flag: String, usage: String },

    #[error("flag `--{flag}` expects a value")]
    MissingFlagValue { flag: String, usage: String },

    #[error("invalid value `{value}` for `--{flag}`")]
    InvalidFlagValue {
        flag: String,
        value: String,
        usage: String,
    },

    #[error("unexpected argument `{arg}`")]
    UnexpectedArgument { arg: String, usage: String },

    #[error("missing argument {name}")]
    MissingArgument { name: String, usage: String },

    #[error("option `{0}` is not declared")]
    UnknownOption(String),

    #[error("missing required option --{0}")]
    MissingRequiredCredential(String),

    #[error("command `{0}` needs a client but none was provided")]
    ClientRequired(String),

    #[error("{0:#}")]
    ClientBootstrapFailure(anyhow::Error),

    #[error("{0:#}")]
    CommandFailure(anyhow::Error),
}

impl ShellError {
    /// Usage text to show alongside this error, if it came out of parsing.
    pub fn usage(&self) -> Option<&str> {
        match self {
            ShellError::UnknownCommand { usage, .. }
            | ShellError::MissingSubcommand { usage }
            | ShellError::UnrecognizedFlag { usage, .. }
            | ShellError::MissingFlagValue { usage, .. }
            | ShellError::InvalidFlagValue { usage, .. }
            | ShellError::UnexpectedArgument { usage, .. }
            | ShellError::MissingArgument { usage, .. } => Some(usage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
