mod handlers;
mod types;

pub use handlers::{
    count_sensors, create_sensors, delete_all_sensors, delete_sensor, get_sensor,
    list_mac_addresses, list_sensors, update_sensor,
};
pub use types::{SensorBatch, SensorCountResponse, SensorPayload, SensorResponse};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_count_sensors, __path_create_sensors, __path_delete_all_sensors, __path_delete_sensor,
    __path_get_sensor, __path_list_mac_addresses, __path_list_sensors, __path_update_sensor,
};
