pub mod documents;
pub mod paths;
pub mod shell;

pub fn handlers() -> impl Fn(tauri::ipc::Invoke<tauri::Wry>) -> bool + Send + Sync + 'static {
    tauri::generate_handler![
        documents::new_window,
        documents::open_file_request,
        documents::open_recent,
        documents::drop_file,
        documents::record_edit,
        documents::save_markdown,
        documents::save_markdown_as,
        documents::save_html,
        documents::revert_document,
        documents::recent_documents,
        shell::show_in_folder,
        shell::open_externally,
        paths::get_logs_directory,
        paths::get_editor_config,
    ]
}
