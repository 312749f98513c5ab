mod handlers;
mod types;

pub use handlers::{
    create_subprocess, delete_subprocess, get_subprocess, list_subprocesses, update_subprocess,
};
pub use types::{SubprocessPayload, SubprocessResponse, DEFAULT_ESTATUS};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_subprocess, __path_delete_subprocess, __path_get_subprocess,
    __path_list_subprocesses, __path_update_subprocess,
};
