//! Execution of parsed CLI commands against a manager.

use std::path::PathBuf;

use crate::config::ManagerConfig;
use crate::error::{KbResult, ValidationError};
use crate::manager::KnowledgeBaseManager;
use crate::notifications::{Notice, NoticeLevel};
use crate::tree::{render_tree, ItemKey};

use super::args::CliCommand;

/// Apply command-specific settings to the config.
pub fn configure(command: &CliCommand, config: ManagerConfig) -> ManagerConfig {
    match command {
        CliCommand::Assign { agent, .. } => config.with_agent_id(agent.clone()),
        _ => config,
    }
}

/// Find a folder by id, then by name ignoring case.
pub fn resolve_folder(manager: &KnowledgeBaseManager, arg: &str) -> KbResult<String> {
    manager
        .read(|s| {
            s.folder(arg).map(|f| f.folder_id.clone()).or_else(|| {
                let wanted = arg.to_lowercase();
                s.folders
                    .iter()
                    .find(|f| f.name.to_lowercase() == wanted)
                    .map(|f| f.folder_id.clone())
            })
        })
        .ok_or_else(|| {
            ValidationError::UnknownFolder {
                folder_id: arg.to_string(),
            }
            .into()
        })
}

/// Find an entry by id, then by filename. Requires entries to be loaded.
pub fn resolve_entry(manager: &KnowledgeBaseManager, arg: &str) -> KbResult<String> {
    manager
        .read(|s| {
            s.find_entry(arg).map(|e| e.entry_id.clone()).or_else(|| {
                s.entry_cache
                    .values()
                    .flatten()
                    .find(|e| e.filename == arg)
                    .map(|e| e.entry_id.clone())
            })
        })
        .ok_or_else(|| {
            ValidationError::UnknownEntry {
                entry_id: arg.to_string(),
            }
            .into()
        })
}

fn print_tree(manager: &KnowledgeBaseManager) {
    let state = manager.snapshot();
    println!("{}", render_tree(&state, manager.capabilities()));
}

/// Run a command. Notices are left in the manager's notifier for the caller.
pub async fn run_command(manager: &KnowledgeBaseManager, command: CliCommand) -> KbResult<()> {
    manager.refetch().await?;

    match command {
        CliCommand::Tree => print_tree(manager),
        CliCommand::Recent => {
            for entry in manager.snapshot().recent {
                let size = entry.format_size().unwrap_or_default();
                println!("{}  {}  [{}]", entry.filename, size, entry.folder_id);
            }
        }
        CliCommand::Expand { folder } => {
            let id = resolve_folder(manager, &folder)?;
            manager.toggle_folder(&id).await?;
            print_tree(manager);
        }
        CliCommand::Mkdir { name } => {
            let created = manager.create_folder().await?;
            match name {
                Some(name) => {
                    manager.set_rename_draft(name)?;
                    manager.commit_rename().await?;
                }
                None => manager.cancel_rename(),
            }
            println!("{}", created.folder_id);
        }
        CliCommand::Rename { folder, name } => {
            let id = resolve_folder(manager, &folder)?;
            manager.start_rename(&id)?;
            manager.set_rename_draft(name)?;
            manager.commit_rename().await?;
        }
        CliCommand::RmFolder { folder, yes } => {
            let id = resolve_folder(manager, &folder)?;
            let target = manager.request_delete(&ItemKey::Folder(id))?;
            confirm_or_cancel(manager, yes, &target.prompt()).await?;
        }
        CliCommand::Rm { entry, yes } => {
            manager.load_all_entries().await?;
            let id = resolve_entry(manager, &entry)?;
            let target = manager.request_delete(&ItemKey::File(id))?;
            confirm_or_cancel(manager, yes, &target.prompt()).await?;
        }
        CliCommand::Mv { entry, folder } => {
            manager.load_all_entries().await?;
            let id = resolve_entry(manager, &entry)?;
            let folder_id = resolve_folder(manager, &folder)?;
            manager.move_entry(&id, &folder_id).await?;
        }
        CliCommand::Upload { folder, paths } => {
            let id = resolve_folder(manager, &folder)?;
            let paths = paths.into_iter().map(PathBuf::from).collect();
            manager.upload_paths(&id, paths).await?;
        }
        CliCommand::Write {
            folder,
            filename,
            content,
        } => {
            let id = resolve_folder(manager, &folder)?;
            manager.create_text_entry(&id, &filename, &content).await?;
        }
        CliCommand::Summary { entry, text } => {
            manager.load_all_entries().await?;
            let id = resolve_entry(manager, &entry)?;
            manager.edit_summary(&id, &text).await?;
        }
        CliCommand::Assign { target, .. } => {
            manager.load_all_entries().await?;
            match resolve_folder(manager, &target) {
                Ok(folder_id) => manager.toggle_folder_assignment(&folder_id).await?,
                Err(_) => {
                    let id = resolve_entry(manager, &target)?;
                    manager.toggle_entry_assignment(&id).await?;
                }
            }
            print_tree(manager);
        }
        CliCommand::Cat { entry } => {
            manager.load_all_entries().await?;
            let id = resolve_entry(manager, &entry)?;
            manager.open_entry(&id)?;
            let content = manager.download_entry_content(&id).await?;
            println!("{}", String::from_utf8_lossy(&content));
        }
        CliCommand::Version | CliCommand::Help | CliCommand::Invalid(_) => {}
    }
    Ok(())
}

async fn confirm_or_cancel(manager: &KnowledgeBaseManager, yes: bool, prompt: &str) -> KbResult<()> {
    if yes {
        manager.confirm_delete().await
    } else {
        manager.cancel_delete();
        println!("{}", prompt);
        println!("Re-run with --yes to confirm.");
        Ok(())
    }
}

/// Print notices: errors to stderr, everything else to stdout.
pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("✓ {}", notice.message),
            NoticeLevel::Info => println!("  {}", notice.message),
            NoticeLevel::Error => eprintln!("✗ {}", notice.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemorySession, MockHttpClient, MockResponse};
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "http://kb.test/api";

    fn manager(http: &MockHttpClient) -> KnowledgeBaseManager {
        http.set_method_response(
            "GET",
            &format!("{}/knowledge-base/folders", BASE),
            MockResponse::json(200, json!([{"folder_id": "F1", "name": "Research"}])),
        );
        http.set_method_response(
            "GET",
            &format!("{}/knowledge-base/folders/F1/entries", BASE),
            MockResponse::json(200, json!([{"entry_id": "e1", "filename": "a.txt", "folder_id": "F1"}])),
        );
        http.set_method_response(
            "GET",
            &format!("{}/knowledge-base/entries/recent?limit=5", BASE),
            MockResponse::json(200, json!([])),
        );
        KnowledgeBaseManager::with_adapters(
            ManagerConfig::default().with_base_url(BASE),
            Arc::new(http.clone()),
            Arc::new(InMemorySession::with_token("tok")),
        )
    }

    #[tokio::test]
    async fn test_resolve_by_name_and_filename() {
        let http = MockHttpClient::new();
        let mgr = manager(&http);
        mgr.refetch().await.unwrap();
        mgr.load_all_entries().await.unwrap();

        assert_eq!(resolve_folder(&mgr, "research").unwrap(), "F1");
        assert_eq!(resolve_entry(&mgr, "a.txt").unwrap(), "e1");
        assert!(resolve_folder(&mgr, "nope").is_err());
    }

    #[tokio::test]
    async fn test_rm_without_yes_sends_no_delete() {
        let http = MockHttpClient::new();
        let mgr = manager(&http);

        run_command(
            &mgr,
            CliCommand::Rm {
                entry: "a.txt".to_string(),
                yes: false,
            },
        )
        .await
        .unwrap();

        assert!(http
            .get_requests()
            .iter()
            .all(|r| r.method != "DELETE"));
        assert!(mgr.snapshot().transient.pending_delete.is_none());
    }

    #[test]
    fn test_configure_assign_sets_agent() {
        let cmd = CliCommand::Assign {
            agent: "agent-1".to_string(),
            target: "F1".to_string(),
        };
        let config = configure(&cmd, ManagerConfig::default());
        assert_eq!(config.agent_id.as_deref(), Some("agent-1"));
    }
}
