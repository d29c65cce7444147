use anyhow::Result;
use clap::{Parser, Subcommand};
use kit::areas::repository::Repository;
use std::path::Path;

#[derive(Parser)]
#[command(
    name = "kit",
    version = "0.1.0",
    about = "A minimal git implementation",
    long_about = "This is a minimal implementation of git's storage and transfer layer, \
    written in Rust. It is not meant to be a full replacement for git, \
    but covers the object store, tree building, packfiles, and cloning \
    over the smart HTTP protocol.",
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
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        It requires the SHA of the object to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes a file as a blob object and can write it to the object database. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the entries of a tree object",
        long_about = "This command lists the entries of a tree object. \
        It accepts a tree SHA, a commit SHA, or HEAD."
    )]
    LsTree {
        #[arg(index = 1, help = "The tree SHA to list")]
        sha: String,
    },
    #[command(
        name = "write-tree",
        about = "Snapshot the working directory as tree objects",
        long_about = "This command stores the working directory as blob and tree objects \
        and prints the SHA of the root tree."
    )]
    WriteTree,
    #[command(
        name = "commit-tree",
        about = "Create a commit object for an existing tree",
        long_about = "This command creates a commit object for the specified tree, \
        with an optional parent commit and a message. The author is read from \
        the GIT_AUTHOR_NAME and GIT_AUTHOR_EMAIL environment variables."
    )]
    CommitTree {
        #[arg(index = 1, help = "The tree SHA to commit")]
        tree: String,
        #[arg(short, long, help = "The parent commit SHA")]
        parent: Option<String>,
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "clone",
        about = "Clone a remote repository over smart HTTP",
        long_about = "This command clones a remote repository: it discovers the remote's refs, \
        downloads a packfile, stores its objects, and checks out the first advertised ref."
    )]
    Clone {
        #[arg(index = 1, help = "The repository URL")]
        url: String,
        #[arg(index = 2, help = "The destination directory")]
        directory: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => Repository::at(Path::new(path), Box::new(std::io::stdout()))?,
                None => {
                    let pwd = std::env::current_dir()?;
                    Repository::at(&pwd, Box::new(std::io::stdout()))?
                }
            };

            repository.init()?
        }
        Commands::CatFile { sha } => {
            let mut repository = open_repository_here()?;

            repository.cat_file(sha)?
        }
        Commands::HashObject { write, file } => {
            let mut repository = open_repository_here()?;

            repository.hash_object(file, *write)?
        }
        Commands::LsTree { sha } => {
            let mut repository = open_repository_here()?;

            repository.ls_tree(sha)?
        }
        Commands::WriteTree => {
            let mut repository = open_repository_here()?;

            repository.write_tree()?
        }
        Commands::CommitTree {
            tree,
            parent,
            message,
        } => {
            let mut repository = open_repository_here()?;

            repository.commit_tree(tree, parent.as_deref(), message)?
        }
        Commands::Clone { url, directory } => {
            Repository::clone_from(url, Path::new(directory), Box::new(std::io::stdout()))?;
        }
    }

    Ok(())
}

fn open_repository_here() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Ok(Repository::open(&pwd, Box::new(std::io::stdout()))?)
}
