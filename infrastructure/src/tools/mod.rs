//! Built-in tools and registry wiring

pub mod code_analysis;
pub mod command;
pub mod discovery;
pub mod file_ops;
pub mod todo;
pub mod vision;
pub mod web;
pub mod workflow;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use alfredo_application::VisionModel;
use alfredo_domain::{TodoStore, ToolRegistry};

/// Resolve a tool path argument against the working directory
pub(crate) fn resolve_path(cwd: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        cwd.join(candidate)
    }
}

/// Registry with every built-in tool registered under the generic
/// variant.
///
/// The todo store must be the same `Arc` the agent is configured with,
/// otherwise the todo tools and the run state drift apart. The vision
/// model is optional; without it `analyze_image` fails at call time
/// rather than disappearing from the tool set.
pub fn builtin_registry(
    todo: Arc<TodoStore>,
    vision: Option<Arc<dyn VisionModel>>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register_spec(file_ops::read_file_spec());
    registry.register_handler(
        file_ops::READ_FILE,
        Arc::new(|cwd| Box::new(file_ops::ReadFileHandler::new(cwd))),
    );

    registry.register_spec(file_ops::write_to_file_spec());
    registry.register_handler(
        file_ops::WRITE_TO_FILE,
        Arc::new(|cwd| Box::new(file_ops::WriteToFileHandler::new(cwd))),
    );

    registry.register_spec(file_ops::replace_in_file_spec());
    registry.register_handler(
        file_ops::REPLACE_IN_FILE,
        Arc::new(|cwd| Box::new(file_ops::ReplaceInFileHandler::new(cwd))),
    );

    registry.register_spec(command::execute_command_spec());
    registry.register_handler(
        command::EXECUTE_COMMAND,
        Arc::new(|cwd| Box::new(command::ExecuteCommandHandler::new(cwd))),
    );

    registry.register_spec(discovery::list_files_spec());
    registry.register_handler(
        discovery::LIST_FILES,
        Arc::new(|cwd| Box::new(discovery::ListFilesHandler::new(cwd))),
    );

    registry.register_spec(discovery::search_files_spec());
    registry.register_handler(
        discovery::SEARCH_FILES,
        Arc::new(|cwd| Box::new(discovery::SearchFilesHandler::new(cwd))),
    );

    registry.register_spec(code_analysis::list_code_definition_names_spec());
    registry.register_handler(
        code_analysis::LIST_CODE_DEFINITION_NAMES,
        Arc::new(|cwd| Box::new(code_analysis::ListCodeDefinitionNamesHandler::new(cwd))),
    );

    registry.register_spec(web::web_fetch_spec());
    registry.register_handler(web::WEB_FETCH, Arc::new(|_| Box::new(web::WebFetchHandler::new())));

    registry.register_spec(vision::analyze_image_spec());
    let vision_model = vision;
    registry.register_handler(
        vision::ANALYZE_IMAGE,
        Arc::new(move |cwd| Box::new(vision::AnalyzeImageHandler::new(cwd, vision_model.clone()))),
    );

    registry.register_spec(todo::write_todo_list_spec());
    let store = todo.clone();
    registry.register_handler(
        todo::WRITE_TODO_LIST,
        Arc::new(move |_| Box::new(todo::WriteTodoListHandler::new(store.clone()))),
    );

    registry.register_spec(todo::read_todo_list_spec());
    let store = todo;
    registry.register_handler(
        todo::READ_TODO_LIST,
        Arc::new(move |_| Box::new(todo::ReadTodoListHandler::new(store.clone()))),
    );

    registry.register_spec(workflow::ask_followup_question_spec());
    registry.register_handler(
        workflow::ASK_FOLLOWUP_QUESTION,
        Arc::new(|_| Box::new(workflow::AskFollowupQuestionHandler)),
    );

    registry.register_spec(workflow::attempt_completion_spec());
    registry.register_handler(
        workflow::ATTEMPT_COMPLETION,
        Arc::new(|_| Box::new(workflow::AttemptCompletionHandler)),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_is_complete() {
        let registry = builtin_registry(Arc::new(TodoStore::new()), None);
        let ids = registry.get_all_tool_ids();
        assert_eq!(
            ids,
            vec![
                "analyze_image",
                "ask_followup_question",
                "attempt_completion",
                "execute_command",
                "list_code_definition_names",
                "list_files",
                "read_file",
                "read_todo_list",
                "replace_in_file",
                "search_files",
                "web_fetch",
                "write_to_file",
                "write_todo_list",
            ]
        );
        for id in &ids {
            assert!(registry.has_handler(id), "missing handler for {}", id);
            assert!(
                registry
                    .get_spec(id, alfredo_domain::ModelFamily::OpenAi)
                    .is_some(),
                "generic fallback failed for {}",
                id
            );
        }
    }
}
