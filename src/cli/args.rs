//! Command-line argument parsing for kbtree.
//!
//! Folders may be named by id or by name (case-insensitive); entries by id
//! or filename.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Print the folder tree (default)
    Tree,
    /// List recently added files
    Recent,
    /// Print the tree with one folder expanded
    Expand { folder: String },
    /// Create a folder; optionally rename it right away
    Mkdir { name: Option<String> },
    Rename { folder: String, name: String },
    /// Delete a folder and its files; refused without `--yes`
    RmFolder { folder: String, yes: bool },
    /// Delete a file; refused without `--yes`
    Rm { entry: String, yes: bool },
    Mv { entry: String, folder: String },
    Upload { folder: String, paths: Vec<String> },
    /// Create a file from text
    Write {
        folder: String,
        filename: String,
        content: String,
    },
    Summary { entry: String, text: String },
    /// Toggle a folder or file in an agent's assignment
    Assign { agent: String, target: String },
    /// Print a file's content to stdout
    Cat { entry: String },
    Version,
    Help,
    /// Unusable arguments, with the reason
    Invalid(String),
}

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
usage: kbtree [command] [args]

commands:
  tree                              show folders (default)
  recent                            show recently added files
  expand <folder>                   show a folder's files
  mkdir [name]                      create a folder
  rename <folder> <name>            rename a folder
  rm-folder <folder> --yes          delete a folder and its files
  rm <file> --yes                   delete a file
  mv <file> <folder>                move a file
  upload <folder> <path>...         upload local files
  write <folder> <filename> <text>  create a file from text
  summary <file> <text>             set a file's summary
  assign <agent> <folder|file>      toggle an agent's access
  cat <file>                        print a file's content
  --version                         print the version";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use kbtree::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["kbtree".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    if args.iter().any(|a| a == "--version" || a == "-V") {
        return CliCommand::Version;
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return CliCommand::Help;
    }

    let yes = args.iter().any(|a| a == "--yes" || a == "-y");
    let positional: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--yes" && *a != "-y")
        .collect();

    let Some((&command, rest)) = positional.split_first() else {
        return CliCommand::Tree;
    };

    let need = |n: usize, usage: &str| -> Result<(), CliCommand> {
        if rest.len() < n {
            Err(CliCommand::Invalid(format!("usage: kbtree {}", usage)))
        } else {
            Ok(())
        }
    };
    let joined = |from: usize| rest[from..].join(" ");

    let parsed = match command {
        "tree" => Ok(CliCommand::Tree),
        "recent" => Ok(CliCommand::Recent),
        "expand" => need(1, "expand <folder>").map(|_| CliCommand::Expand {
            folder: rest[0].to_string(),
        }),
        "mkdir" => Ok(CliCommand::Mkdir {
            name: (!rest.is_empty()).then(|| joined(0)),
        }),
        "rename" => need(2, "rename <folder> <name>").map(|_| CliCommand::Rename {
            folder: rest[0].to_string(),
            name: joined(1),
        }),
        "rm-folder" => need(1, "rm-folder <folder> --yes").map(|_| CliCommand::RmFolder {
            folder: rest[0].to_string(),
            yes,
        }),
        "rm" => need(1, "rm <file> --yes").map(|_| CliCommand::Rm {
            entry: rest[0].to_string(),
            yes,
        }),
        "mv" => need(2, "mv <file> <folder>").map(|_| CliCommand::Mv {
            entry: rest[0].to_string(),
            folder: rest[1].to_string(),
        }),
        "upload" => need(2, "upload <folder> <path>...").map(|_| CliCommand::Upload {
            folder: rest[0].to_string(),
            paths: rest[1..].iter().map(|p| p.to_string()).collect(),
        }),
        "write" => need(3, "write <folder> <filename> <text>").map(|_| CliCommand::Write {
            folder: rest[0].to_string(),
            filename: rest[1].to_string(),
            content: joined(2),
        }),
        "summary" => need(2, "summary <file> <text>").map(|_| CliCommand::Summary {
            entry: rest[0].to_string(),
            text: joined(1),
        }),
        "assign" => need(2, "assign <agent> <folder|file>").map(|_| CliCommand::Assign {
            agent: rest[0].to_string(),
            target: rest[1].to_string(),
        }),
        "cat" => need(1, "cat <file>").map(|_| CliCommand::Cat {
            entry: rest[0].to_string(),
        }),
        "help" => Ok(CliCommand::Help),
        other => Err(CliCommand::Invalid(format!("unknown command: {}", other))),
    };

    match parsed {
        Ok(command) | Err(command) => command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let mut all = vec!["kbtree".to_string()];
        all.extend(args.iter().map(|a| a.to_string()));
        parse_args(all.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["mv", "-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse(&[]), CliCommand::Tree);
    }

    #[test]
    fn test_parse_rename_joins_name() {
        assert_eq!(
            parse(&["rename", "F1", "Q3", "reports"]),
            CliCommand::Rename {
                folder: "F1".to_string(),
                name: "Q3 reports".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_yes_anywhere() {
        assert_eq!(
            parse(&["rm", "--yes", "e1"]),
            CliCommand::Rm {
                entry: "e1".to_string(),
                yes: true,
            }
        );
        assert_eq!(
            parse(&["rm-folder", "F1"]),
            CliCommand::RmFolder {
                folder: "F1".to_string(),
                yes: false,
            }
        );
    }

    #[test]
    fn test_parse_upload_paths() {
        assert_eq!(
            parse(&["upload", "F1", "a.pdf", "b.pdf"]),
            CliCommand::Upload {
                folder: "F1".to_string(),
                paths: vec!["a.pdf".to_string(), "b.pdf".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_missing_args() {
        assert_eq!(
            parse(&["mv", "e1"]),
            CliCommand::Invalid("usage: kbtree mv <file> <folder>".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(matches!(parse(&["frobnicate"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_mkdir_optional_name() {
        assert_eq!(parse(&["mkdir"]), CliCommand::Mkdir { name: None });
        assert_eq!(
            parse(&["mkdir", "Research"]),
            CliCommand::Mkdir {
                name: Some("Research".to_string())
            }
        );
    }
}
