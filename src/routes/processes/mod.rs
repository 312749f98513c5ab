mod handlers;
mod types;

pub use handlers::{
    create_process, delete_process, get_current_process, get_process, list_processes,
    update_process,
};
pub use types::{display_date, ProcessDates, ProcessDeletedResponse, ProcessPayload, ProcessResponse};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_process, __path_delete_process, __path_get_current_process, __path_get_process,
    __path_list_processes, __path_update_process,
};
