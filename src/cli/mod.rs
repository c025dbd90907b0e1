use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Send a single prompt and print the reply
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        prompt: Vec<String>,
    },

    /// Show the current chat history
    History {
        /// Only show the newest N messages
        #[arg(short, long)]
        last: Option<usize>,
    },

    /// Archive the current chat and start a new one
    New,

    /// Delete the current chat without archiving it
    Delete,
}
