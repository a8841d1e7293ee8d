use anyhow::Result;
use clap::{Parser, Subcommand};
use vcs::areas::repository::Repository;
use vcs::artifacts::core::CommandError;

#[derive(Parser)]
#[command(
    name = "vcs",
    version = "0.1.0",
    about = "A minimal single-user version-control engine",
    long_about = "A minimal version-control engine tracking flat text files: \
    content-addressed commits, a staging index, branches, and three-way merges. \
    It is a learning project, not a git replacement.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Initialize a new repository in the current directory")]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1, help = "The file to stage")]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged changes as a new commit")]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "rm", about = "Unstage a file or mark a tracked file for removal")]
    Rm {
        #[arg(index = 1, help = "The file to remove")]
        file: String,
    },
    #[command(name = "log", about = "Show the current branch's history")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1, help = "The exact commit message to search for")]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged, removed and untracked files")]
    Status,
    #[command(
        name = "checkout",
        about = "Check out a branch, or a file from a commit",
        long_about = "Three forms: `checkout <branch>` switches branches, \
        `checkout -p <file>` restores a file from the head commit, and \
        `checkout <commit> -p <file>` restores a file from an arbitrary commit."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch or commit to check out from")]
        target: Option<String>,
        #[arg(short = 'p', long = "path", help = "The file to restore")]
        path: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1, help = "The branch name")]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1, help = "The branch name")]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch to an arbitrary commit")]
    Reset {
        #[arg(index = 1, help = "The commit id, full or abbreviated")]
        commit: String,
    },
    #[command(name = "merge", about = "Merge another branch into the current one")]
    Merge {
        #[arg(index = 1, help = "The branch to merge in")]
        branch: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let pwd = std::env::current_dir()?;
    let mut repository = Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

    if let Commands::Init = &cli.command {
        if repository.is_initialized() {
            println!("A vcs repository already exists in the current directory.");
            return Ok(());
        }
        return report(repository.init());
    }

    if !repository.is_initialized() {
        println!("Not in an initialized vcs directory.");
        return Ok(());
    }

    let result = match &cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Add { file } => repository.add(file),
        Commands::Commit { message } => repository.commit(message),
        Commands::Rm { file } => repository.remove(file),
        Commands::Log => repository.log(),
        Commands::GlobalLog => repository.global_log(),
        Commands::Find { message } => repository.find(message),
        Commands::Status => repository.status(),
        Commands::Checkout { target, path } => match (target, path) {
            (Some(branch), None) => repository.checkout_branch(branch),
            (None, Some(file)) => repository.checkout_file(file),
            (Some(commit), Some(file)) => repository.checkout_commit_file(commit, file),
            (None, None) => {
                println!("Incorrect operands.");
                return Ok(());
            }
        },
        Commands::Branch { name } => repository.branch(name),
        Commands::RmBranch { name } => repository.remove_branch(name),
        Commands::Reset { commit } => repository.reset(commit),
        Commands::Merge { branch } => repository.merge(branch).map(|_| ()),
    };

    report(result)
}

/// Reportable failures print their message and exit successfully; anything
/// else propagates as a real error.
fn report(result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(error) => match error.downcast_ref::<CommandError>() {
            Some(command_error) => {
                println!("{}", command_error);
                Ok(())
            }
            None => Err(error),
        },
    }
}
