use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pollbox")]
#[command(version, about = "A self-hosted polling engine")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new pollbox project in the current directory
    Init,

    /// Add a new question or choice
    Add(AddCommand),

    /// List questions
    List {
        /// Only questions already published (hides scheduled ones)
        #[arg(long)]
        published: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a single question with its choices
    Get {
        /// Question ID (sequence number like "3" or UUID prefix like "a1b2c")
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a question
    Update {
        /// Question ID (sequence number or UUID prefix)
        id: String,

        /// New question text
        #[arg(long)]
        text: Option<String>,

        /// New publication instant (RFC 3339, or YYYY-MM-DD for midnight UTC)
        #[arg(long = "pub-date")]
        pub_date: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a question and all of its choices
    Delete {
        /// Question ID (sequence number or UUID prefix)
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Edit a choice's text
    UpdateChoice {
        /// Choice ID (sequence number or UUID prefix)
        id: String,

        /// New choice text
        #[arg(long)]
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a choice
    DeleteChoice {
        /// Choice ID (sequence number or UUID prefix)
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Record a vote for a choice on a published question
    Vote {
        /// Question (sequence number or UUID prefix)
        question: String,

        /// Choice (sequence number or UUID prefix)
        choice: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show vote tallies for a question
    Results {
        /// Question ID (sequence number or UUID prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Full-text search over question text
    Search {
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
}

#[derive(Args, Debug)]
pub struct AddCommand {
    #[command(subcommand)]
    pub entity: AddEntity,
}

#[derive(Subcommand, Debug)]
pub enum AddEntity {
    /// Add a new question
    Question {
        /// Question text
        text: String,

        /// Publication instant (RFC 3339, or YYYY-MM-DD for midnight UTC).
        /// Defaults to now; a future date schedules the question.
        #[arg(long = "pub-date")]
        pub_date: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a choice under an existing question
    Choice {
        /// Choice text
        text: String,

        /// Owning question (sequence number or UUID prefix)
        #[arg(long, short = 'q')]
        question: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
